//! # 共享常量
//!
//! 容器解析与隐写编解码共同使用的校验规则，集中定义在此处。

/// 可识别的 BMP 家族魔数 (文件前两个字节)。
pub const VALID_MAGICS: [[u8; 2]; 6] = [*b"BM", *b"BA", *b"CI", *b"CP", *b"IC", *b"PT"];

/// 魔数所占字节数。
pub const MAGIC_LEN: usize = 2;

/// 固定头部中每个 `u32` 字段所占字节数。
pub const HEADER_FIELD_LEN: usize = 4;

/// 固定头部总长度：魔数 + 文件大小 + 保留字段 + 像素数据偏移 = 14 字节。
pub const CORE_HEADER_LEN: usize = MAGIC_LEN + HEADER_FIELD_LEN * 3;

/// 可隐藏消息的最小长度 (字节)。
pub const MIN_MESSAGE_LENGTH: usize = 1;

/// 可隐藏消息的最大长度 (字节)。
/// 元数据字的低 29 位存放长度，高 3 位存放 bits-per-byte。
pub const MAX_MESSAGE_LENGTH: u32 = 0x1FFF_FFFF;

/// 每个像素字节最少使用的低位数。
pub const MIN_BITS_PER_BYTE: u8 = 1;

/// 每个像素字节最多使用的低位数。
pub const MAX_BITS_PER_BYTE: u8 = 8;

/// bits-per-byte 在元数据字中的位移。
pub const BITS_PER_BYTE_SHIFT: u32 = 29;

/// 隐藏一个消息字节所消耗的像素字节数 (每个像素字节承载消息的一个位)。
pub const PIXEL_BYTES_PER_MESSAGE_BYTE: usize = 8;

/// 命令行未指定时使用的 bits-per-byte。
pub const DEFAULT_BITS_PER_BYTE: u8 = 1;

/// 未指定输出路径时，隐写结果图像的文件名前缀。
pub const DOCTORED_PREFIX: &str = "doctored_";

/// 未指定输出路径时，恢复出的消息文件名前缀。
pub const RECOVERED_PREFIX: &str = "recovered_";

/// 恢复出的消息文件的默认扩展名。
pub const RECOVERED_EXTENSION: &str = "bin";
