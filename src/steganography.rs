//! # 隐写编解码
//!
//! 消息按位从高到低写入像素数据：消息的第 `i` 位写入第 `i` 个像素字节。
//! 像素字节的低 `bits_per_byte` 位先被清零，再与
//! `(message[i / 8] >> (7 - i % 8)) & mask` 按位或。
//! 每个消息位固定消耗一个像素字节，bits-per-byte 只决定掩码宽度。

use log::debug;

use crate::bits::{bit_mask, required_capacity};
use crate::bmp::BmpFile;
use crate::constants::{
    MAX_BITS_PER_BYTE, MAX_MESSAGE_LENGTH, MIN_BITS_PER_BYTE, MIN_MESSAGE_LENGTH,
    PIXEL_BYTES_PER_MESSAGE_BYTE,
};
use crate::error::{Result, StegoError};

/// 将 `message` 隐藏到 `bmp` 的像素数据中。
///
/// # Errors
///
/// * `bits_per_byte` 不在 `1..=8` 内时返回 [`StegoError::InvalidBitsPerByte`]。
/// * 消息为空或超过 29 位长度上限时返回 [`StegoError::InvalidMessageLength`]。
/// * 像素数据少于 `message.len() * 8` 字节时返回 [`StegoError::InsufficientCapacity`]。
/// * 容器拒绝新的元数据时，原样返回 [`BmpFile::set_payload`] 的错误，`bmp` 不被修改。
pub fn hide(bmp: &mut BmpFile, message: &[u8], bits_per_byte: u8) -> Result<()> {
    if !(MIN_BITS_PER_BYTE..=MAX_BITS_PER_BYTE).contains(&bits_per_byte) {
        return Err(StegoError::InvalidBitsPerByte(bits_per_byte));
    }

    if message.len() < MIN_MESSAGE_LENGTH || message.len() > MAX_MESSAGE_LENGTH as usize {
        return Err(StegoError::InvalidMessageLength(message.len()));
    }

    let available = bmp.pixel_array().len();
    let required = required_capacity(message.len())
        .filter(|&required| required <= available)
        .ok_or(StegoError::InsufficientCapacity {
            required: message.len().saturating_mul(PIXEL_BYTES_PER_MESSAGE_BYTE),
            available,
        })?;

    let mask = bit_mask(bits_per_byte);
    let mut pixels = bmp.pixel_array().to_vec();

    for (i, pixel) in pixels[..required].iter_mut().enumerate() {
        let bit = (message[i >> 3] >> (7 - i % 8)) & mask;
        *pixel = (*pixel & !mask) | bit;
    }

    debug!(
        "Hid {} bytes in {} pixel bytes at {} bits per byte",
        message.len(),
        required,
        bits_per_byte
    );

    bmp.set_payload(pixels, message.len(), bits_per_byte)
}

/// 从 `bmp` 中取出隐藏的消息，并将使用过的像素低位清零。
///
/// 成功后容器的消息长度和 bits-per-byte 都被置为 `0`。
/// 没有隐藏消息时返回空向量，调用方应先用 [`BmpFile::has_message`] 判断。
///
/// # Errors
///
/// 像素数据少于 `message_length * 8` 字节时返回 [`StegoError::InsufficientData`]。
pub fn expose(bmp: &mut BmpFile) -> Result<Vec<u8>> {
    let message_length = bmp.message_length();
    let bits_per_byte = bmp.bits_per_byte();

    let available = bmp.pixel_array().len();
    let required = required_capacity(message_length)
        .filter(|&required| required <= available)
        .ok_or(StegoError::InsufficientData {
            required: message_length.saturating_mul(PIXEL_BYTES_PER_MESSAGE_BYTE),
            available,
        })?;

    let mask = bit_mask(bits_per_byte);
    let mut pixels = bmp.pixel_array().to_vec();
    let mut message = vec![0u8; message_length];

    for (i, pixel) in pixels[..required].iter_mut().enumerate() {
        let hidden = *pixel & mask;
        *pixel ^= hidden;
        message[i >> 3] |= hidden << (7 - i % 8);
    }

    debug!(
        "Exposed {} bytes from {} pixel bytes at {} bits per byte",
        message_length, required, bits_per_byte
    );

    bmp.set_payload(pixels, 0, 0)?;
    Ok(message)
}
