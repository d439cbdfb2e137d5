//! 基础设施层
//!
//! 持有底层资源（PDF 页面内容），只暴露能力

pub mod pdf_document;

pub use pdf_document::{FontStyle, PdfDocument};
