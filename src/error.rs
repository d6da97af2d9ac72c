//! # 错误类型
//!
//! 容器解析和隐写编解码过程中可能出现的全部错误。

use std::io;

use thiserror::Error;

/// 解析 BMP 容器、隐藏或恢复消息时可能出现的错误。
#[derive(Debug, Error)]
pub enum StegoError {
    #[error("Invalid magic bytes. The file is not a BMP image.")]
    InvalidMagic,

    #[error("Not enough bytes to read the entire header: got {0}, need 14.")]
    TruncatedHeader(usize),

    #[error("Pixel array offset {0} points inside the 14-byte file header.")]
    InvalidPixelOffset(u32),

    #[error(
        "Not enough bytes to read the pixel array (offset {offset}, declared size {declared_size}, {available} bytes after the header)."
    )]
    TruncatedPixelArray {
        offset: u32,
        declared_size: u32,
        available: usize,
    },

    #[error("Incoherent pixel data length: expected {expected}, got {actual}.")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Incoherent message length {message_length} for {capacity} pixel bytes.")]
    MessageTooLong {
        message_length: usize,
        capacity: usize,
    },

    #[error("Invalid bits per byte: {0}.")]
    InvalidBitsPerByte(u8),

    #[error("Invalid message length: {0}.")]
    InvalidMessageLength(usize),

    #[error(
        "Not enough space in the pixel array to hide the message. Required: {required}, Available: {available}"
    )]
    InsufficientCapacity { required: usize, available: usize },

    #[error(
        "Pixel array is too small to retrieve the hidden message. Required: {required}, Available: {available}"
    )]
    InsufficientData { required: usize, available: usize },

    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, StegoError>;
