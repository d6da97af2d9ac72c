//! # BMP 容器
//!
//! 只解析定位像素数据所需的最少头部字段，并把 BMP 的保留字段
//! (偏移 6 处的 4 个字节) 用作隐藏消息的元数据。
//! 固定头部与像素数据之间的其他头部原样保留。

use std::fs;
use std::path::Path;

use log::{debug, warn};

use crate::bits::Metadata;
use crate::constants::{
    CORE_HEADER_LEN, HEADER_FIELD_LEN, MAGIC_LEN, MAX_MESSAGE_LENGTH, PIXEL_BYTES_PER_MESSAGE_BYTE,
    VALID_MAGICS,
};
use crate::error::{Result, StegoError};

/// 解析后的 BMP 文件。
///
/// 像素数据只能通过 [`BmpFile::set_payload`] 整体替换。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BmpFile {
    magic: [u8; 2],
    declared_file_size: u32,
    pixel_array_offset: u32,
    metadata: Metadata,
    extra_headers: Vec<u8>,
    pixel_array: Vec<u8>,
}

/// 从 `bytes` 的 `at` 处读取一个小端 `u32`，调用方保证范围有效。
fn read_u32_le(bytes: &[u8], at: usize) -> u32 {
    let mut field = [0u8; HEADER_FIELD_LEN];
    field.copy_from_slice(&bytes[at..at + HEADER_FIELD_LEN]);
    u32::from_le_bytes(field)
}

impl BmpFile {
    /// 将完整的文件内容解析为容器。
    ///
    /// # Errors
    ///
    /// * 少于 2 字节或魔数无法识别时返回 [`StegoError::InvalidMagic`]。
    /// * 固定头部不足 14 字节时返回 [`StegoError::TruncatedHeader`]。
    /// * 像素数据偏移落在固定头部内时返回 [`StegoError::InvalidPixelOffset`]。
    /// * 声明的像素数据区域超出缓冲区时返回 [`StegoError::TruncatedPixelArray`]。
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let magic: [u8; 2] = bytes
            .get(..MAGIC_LEN)
            .and_then(|m| <[u8; 2]>::try_from(m).ok())
            .filter(|m| VALID_MAGICS.contains(m))
            .ok_or(StegoError::InvalidMagic)?;

        if bytes.len() < CORE_HEADER_LEN {
            return Err(StegoError::TruncatedHeader(bytes.len()));
        }

        let declared_file_size = read_u32_le(bytes, MAGIC_LEN);
        let metadata = Metadata::from_word(read_u32_le(bytes, MAGIC_LEN + HEADER_FIELD_LEN));
        let pixel_array_offset = read_u32_le(bytes, MAGIC_LEN + HEADER_FIELD_LEN * 2);

        let offset = pixel_array_offset as usize;
        if offset < CORE_HEADER_LEN {
            return Err(StegoError::InvalidPixelOffset(pixel_array_offset));
        }

        let truncated = || StegoError::TruncatedPixelArray {
            offset: pixel_array_offset,
            declared_size: declared_file_size,
            available: bytes.len() - CORE_HEADER_LEN,
        };

        let pixel_array_len = declared_file_size
            .checked_sub(pixel_array_offset)
            .ok_or_else(truncated)? as usize;
        let end = offset.checked_add(pixel_array_len).ok_or_else(truncated)?;
        if end > bytes.len() {
            return Err(truncated());
        }
        if end < bytes.len() {
            warn!(
                "Ignoring {} bytes past the declared file size of {}",
                bytes.len() - end,
                declared_file_size
            );
        }

        debug!(
            "Parsed {} bitmap: declared size {}, pixel offset {}, {} pixel bytes, message length {}, {} bits per byte",
            String::from_utf8_lossy(&magic),
            declared_file_size,
            pixel_array_offset,
            pixel_array_len,
            metadata.message_length,
            metadata.bits_per_byte
        );

        Ok(Self {
            magic,
            declared_file_size,
            pixel_array_offset,
            metadata,
            extra_headers: bytes[CORE_HEADER_LEN..offset].to_vec(),
            pixel_array: bytes[offset..end].to_vec(),
        })
    }

    /// 读取整个文件并解析。
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = fs::read(path)?;
        Self::parse(&bytes)
    }

    /// 序列化为完整的文件内容。
    ///
    /// 除元数据字总是以规范形式写出外，其余字节与解析时一致。
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out =
            Vec::with_capacity(CORE_HEADER_LEN + self.extra_headers.len() + self.pixel_array.len());
        out.extend_from_slice(&self.magic);
        out.extend_from_slice(&self.declared_file_size.to_le_bytes());
        out.extend_from_slice(&self.metadata.to_word().to_le_bytes());
        out.extend_from_slice(&self.pixel_array_offset.to_le_bytes());
        out.extend_from_slice(&self.extra_headers);
        out.extend_from_slice(&self.pixel_array);
        out
    }

    /// 序列化并写入 `path`。
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_bytes())?;
        Ok(())
    }

    /// 同时替换像素数据、消息长度和 bits-per-byte。
    ///
    /// 任一校验失败时容器保持不变。bits-per-byte 只要求等于 1 或为偶数。
    pub fn set_payload(
        &mut self,
        pixel_data: Vec<u8>,
        message_length: usize,
        bits_per_byte: u8,
    ) -> Result<()> {
        if pixel_data.len() != self.pixel_array.len() {
            return Err(StegoError::LengthMismatch {
                expected: self.pixel_array.len(),
                actual: pixel_data.len(),
            });
        }

        let message_length_field = u32::try_from(message_length)
            .ok()
            .filter(|&len| message_length <= pixel_data.len() && len <= MAX_MESSAGE_LENGTH)
            .ok_or(StegoError::MessageTooLong {
                message_length,
                capacity: pixel_data.len(),
            })?;

        if bits_per_byte != 1 && bits_per_byte % 2 != 0 {
            return Err(StegoError::InvalidBitsPerByte(bits_per_byte));
        }

        self.pixel_array = pixel_data;
        self.metadata = Metadata {
            message_length: message_length_field,
            bits_per_byte,
        };
        Ok(())
    }

    /// 是否隐藏了消息。
    pub fn has_message(&self) -> bool {
        self.metadata.message_length > 0
    }

    pub fn message_length(&self) -> usize {
        self.metadata.message_length as usize
    }

    pub fn bits_per_byte(&self) -> u8 {
        self.metadata.bits_per_byte
    }

    pub fn magic(&self) -> [u8; 2] {
        self.magic
    }

    pub fn declared_file_size(&self) -> u32 {
        self.declared_file_size
    }

    pub fn pixel_array_offset(&self) -> u32 {
        self.pixel_array_offset
    }

    pub fn extra_headers(&self) -> &[u8] {
        &self.extra_headers
    }

    pub fn pixel_array(&self) -> &[u8] {
        &self.pixel_array
    }

    /// 可隐藏的最大消息长度 (字节)。
    pub fn capacity(&self) -> usize {
        (self.pixel_array.len() / PIXEL_BYTES_PER_MESSAGE_BYTE)
            .min(MAX_MESSAGE_LENGTH as usize)
    }
}

impl TryFrom<&[u8]> for BmpFile {
    type Error = StegoError;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::parse(bytes)
    }
}
