//! PDF 排版器 - 基础设施层
//!
//! 持有页面内容，只暴露"加页 / 设置字体 / 写一行 / 序列化"的能力。
//! 使用 PDF 标准字体 Courier（等宽），所以换行宽度可以按字符数计算

use crate::error::{AppError, AppResult};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use std::path::Path;

/// A4 宽度（pt）
pub const PAGE_WIDTH: i64 = 595;
/// A4 高度（pt）
pub const PAGE_HEIGHT: i64 = 842;
/// 四周保留的边距（约 15mm）
pub const MARGIN: i64 = 42;

/// Courier 每个字符的宽度（千分之一 em）
const GLYPH_WIDTH: i64 = 600;

/// 字体样式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
}

impl FontStyle {
    fn resource_name(&self) -> &'static str {
        match self {
            FontStyle::Regular => "F1",
            FontStyle::Bold => "F2",
        }
    }
}

/// 分页文本文档
pub struct PdfDocument {
    pages: Vec<Vec<Operation>>,
    current: Option<Vec<Operation>>,
    cursor_y: i64,
    font: FontStyle,
    font_size: i64,
    lossy: bool,
}

impl Default for PdfDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfDocument {
    /// 创建空文档（第一次写入时自动加页）
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: None,
            cursor_y: PAGE_HEIGHT - MARGIN,
            font: FontStyle::Regular,
            font_size: 12,
            lossy: false,
        }
    }

    /// 遇到无法编码的字符时用 '?' 代替，而不是报错
    pub fn with_lossy_text(mut self, lossy: bool) -> Self {
        self.lossy = lossy;
        self
    }

    /// 开始新的一页
    pub fn add_page(&mut self) {
        if let Some(page) = self.current.take() {
            self.pages.push(page);
        }
        self.current = Some(Vec::new());
        self.cursor_y = PAGE_HEIGHT - MARGIN;
    }

    /// 设置后续行使用的字体和字号
    pub fn set_font(&mut self, font: FontStyle, size: i64) {
        self.font = font;
        self.font_size = size.max(1);
    }

    /// 当前字号下的行高
    pub fn line_height(&self) -> i64 {
        self.font_size * 3 / 2
    }

    /// 当前字号下一行最多容纳的字符数
    pub fn chars_per_line(&self) -> usize {
        let usable = (PAGE_WIDTH - 2 * MARGIN) * 1000;
        (usable / (self.font_size * GLYPH_WIDTH)).max(1) as usize
    }

    /// 写入一行文本
    ///
    /// 文本中的换行符会拆成多行，超出页宽的行按单词折行，
    /// 页面剩余空间不足时自动换页
    pub fn write_line(&mut self, text: &str) -> AppResult<()> {
        let width = self.chars_per_line();
        for segment in text.split('\n') {
            let encoded = encode_win_ansi(segment.trim_end_matches('\r'), self.lossy)?;
            for line in wrap(&encoded, width) {
                self.emit(line.to_vec());
            }
        }
        Ok(())
    }

    /// 空一行
    pub fn blank_line(&mut self) {
        self.ensure_room();
        self.cursor_y -= self.line_height();
    }

    /// 已有的页数
    pub fn page_count(&self) -> usize {
        self.pages.len() + usize::from(self.current.is_some())
    }

    /// 序列化为 PDF 字节
    pub fn to_bytes(mut self) -> AppResult<Vec<u8>> {
        if self.current.is_none() && self.pages.is_empty() {
            self.add_page();
        }
        if let Some(page) = self.current.take() {
            self.pages.push(page);
        }

        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let bold_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => regular_id,
                "F2" => bold_id,
            },
        });

        let page_count = self.pages.len() as i64;
        let mut kids: Vec<Object> = Vec::with_capacity(self.pages.len());
        for operations in self.pages {
            let content = Content { operations };
            let encoded = content.encode().map_err(AppError::render)?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let media_box: Vec<Object> = vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(PAGE_WIDTH),
            Object::Integer(PAGE_HEIGHT),
        ];
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
            "Resources" => resources_id,
            "MediaBox" => media_box,
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).map_err(AppError::render)?;
        Ok(bytes)
    }

    /// 序列化并写入文件（覆盖已有文件）
    pub fn save(self, path: &Path) -> AppResult<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes).map_err(|e| AppError::io_failure(path, e))
    }

    fn ensure_room(&mut self) {
        if self.current.is_none() || self.cursor_y - self.line_height() < MARGIN {
            self.add_page();
        }
    }

    fn emit(&mut self, text: Vec<u8>) {
        self.ensure_room();
        let baseline = self.cursor_y - self.font_size;
        let font = self.font.resource_name();
        let size = self.font_size;

        if let Some(page) = self.current.as_mut() {
            page.push(Operation::new("BT", vec![]));
            page.push(Operation::new("Tf", vec![font.into(), Object::Integer(size)]));
            page.push(Operation::new("Td", vec![Object::Integer(MARGIN), Object::Integer(baseline)]));
            page.push(Operation::new(
                "Tj",
                vec![Object::String(text, StringFormat::Hexadecimal)],
            ));
            page.push(Operation::new("ET", vec![]));
        }
        self.cursor_y -= self.line_height();
    }
}

/// 按单词折行，单词本身超宽时强制截断
fn wrap(text: &[u8], width: usize) -> Vec<&[u8]> {
    let mut lines = Vec::new();
    let mut rest = text;

    while rest.len() > width {
        let split = rest[..=width]
            .iter()
            .rposition(|b| *b == b' ')
            .filter(|p| *p > 0)
            .unwrap_or(width);
        lines.push(&rest[..split]);
        rest = &rest[split..];
        while rest.first() == Some(&b' ') {
            rest = &rest[1..];
        }
    }

    if !rest.is_empty() || lines.is_empty() {
        lines.push(rest);
    }
    lines
}

/// 编码为标准字体使用的 WinAnsiEncoding
fn encode_win_ansi(text: &str, lossy: bool) -> AppResult<Vec<u8>> {
    text.chars()
        .map(|c| match win_ansi_byte(c) {
            Some(b) => Ok(b),
            None if lossy => Ok(b'?'),
            None => Err(AppError::render(format!(
                "字符 {:?} (U+{:04X}) 无法用标准字体渲染",
                c, c as u32
            ))),
        })
        .collect()
}

fn win_ansi_byte(c: char) -> Option<u8> {
    let byte = match c {
        '\t' => b' ',
        ' '..='~' => c as u8,
        '\u{a0}'..='\u{ff}' => c as u32 as u8,
        '€' => 0x80,
        '‚' => 0x82,
        'ƒ' => 0x83,
        '„' => 0x84,
        '…' => 0x85,
        '†' => 0x86,
        '‡' => 0x87,
        'ˆ' => 0x88,
        '‰' => 0x89,
        'Š' => 0x8a,
        '‹' => 0x8b,
        'Œ' => 0x8c,
        'Ž' => 0x8e,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '˜' => 0x98,
        '™' => 0x99,
        'š' => 0x9a,
        '›' => 0x9b,
        'œ' => 0x9c,
        'ž' => 0x9e,
        'Ÿ' => 0x9f,
        _ => return None,
    };
    Some(byte)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_still_has_one_page() {
        let bytes = PdfDocument::new().to_bytes().unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn paginates_when_vertical_space_runs_out() {
        let mut doc = PdfDocument::new();
        let lines_per_page = ((PAGE_HEIGHT - 2 * MARGIN) / doc.line_height()) as usize;

        for i in 0..lines_per_page {
            doc.write_line(&format!("line {}", i)).unwrap();
        }
        assert_eq!(doc.page_count(), 1);

        doc.write_line("overflow").unwrap();
        assert_eq!(doc.page_count(), 2);

        let loaded = Document::load_mem(&doc.to_bytes().unwrap()).unwrap();
        assert_eq!(loaded.get_pages().len(), 2);
    }

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(wrap(b"aaa bbb ccc", 7), vec![&b"aaa bbb"[..], &b"ccc"[..]]);
        assert_eq!(wrap(b"abcdefghij", 4), vec![&b"abcd"[..], &b"efgh"[..], &b"ij"[..]]);
        assert_eq!(wrap(b"", 4), vec![&b""[..]]);
    }

    #[test]
    fn rejects_characters_outside_win_ansi() {
        let mut doc = PdfDocument::new();
        let err = doc.write_line("Rust 🦀").unwrap_err();
        assert!(matches!(err, AppError::RenderFailure(_)));

        assert!(doc.write_line("Café – “quoted” €5").is_ok());
    }

    #[test]
    fn lossy_mode_replaces_unsupported_characters() {
        assert_eq!(encode_win_ansi("a🦀b", true).unwrap(), b"a?b".to_vec());
    }
}
