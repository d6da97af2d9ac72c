//! # 位运算与容量计算
//!
//! 元数据字的打包/解包，以及隐藏消息所需像素字节数的计算。

use crate::constants::{BITS_PER_BYTE_SHIFT, MAX_MESSAGE_LENGTH, PIXEL_BYTES_PER_MESSAGE_BYTE};

/// 隐藏 `message_len` 字节的消息所需的像素字节数。
///
/// 无论 bits-per-byte 取何值，每个消息位都占用一个像素字节。
/// 溢出时返回 `None`。
pub fn required_capacity(message_len: usize) -> Option<usize> {
    message_len.checked_mul(PIXEL_BYTES_PER_MESSAGE_BYTE)
}

/// 选中像素字节低 `bits_per_byte` 位的掩码。
///
/// `0` 得到空掩码，`8` 及以上得到 `0xFF`。
pub fn bit_mask(bits_per_byte: u8) -> u8 {
    ((1u16 << bits_per_byte.min(8)) - 1) as u8
}

/// 存放在 BMP 保留字段 (偏移 6) 中的隐藏消息元数据。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Metadata {
    /// 隐藏消息的字节数，`0` 表示没有消息。
    pub message_length: u32,
    /// 每个像素字节使用的低位数。
    pub bits_per_byte: u8,
}

impl Metadata {
    /// 将原始元数据字拆分为消息长度和 bits-per-byte。
    ///
    /// 高 3 位按有符号 3 位数解读，取绝对值后加 1。
    /// 因此存储值 `0..=3` 对应 `1..=4`，`4..=7` 对应 `5..=2`。
    pub fn from_word(word: u32) -> Self {
        let stored = (word >> BITS_PER_BYTE_SHIFT) as u8;
        let magnitude = if stored & 0b100 != 0 { 8 - stored } else { stored };

        Self {
            message_length: word & MAX_MESSAGE_LENGTH,
            bits_per_byte: magnitude + 1,
        }
    }

    /// 打包为 `((bits_per_byte - 1) << 29) | message_length`。
    ///
    /// `bits_per_byte == 0` (消息已被取出) 按回绕减法处理，高 3 位全为 1。
    pub fn to_word(self) -> u32 {
        let bits = u32::from(self.bits_per_byte).wrapping_sub(1) << BITS_PER_BYTE_SHIFT;
        bits | (self.message_length & MAX_MESSAGE_LENGTH)
    }
}
