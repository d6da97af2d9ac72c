//! # bmp_shadow 库
//!
//! 本库包含 BMP 隐写工具的核心逻辑：BMP 容器的解析与序列化，
//! 以及把任意字节序列写入/取出像素数据低位的编解码。

// 声明库包含的所有模块。

pub mod bits;
pub mod bmp;
pub mod cli;
pub mod constants;
pub mod error;
pub mod handler;
pub mod steganography;

pub use bmp::BmpFile;
pub use error::{Result, StegoError};
pub use steganography::{expose, hide};
