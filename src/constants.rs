/// 长度头部占用的通道样本数。
/// 头部固定以每个通道样本 1 bit 的速率写入，与用户选择的 bits-per-channel 无关，
/// 因此 16 个样本即可存放一个大端序的 `u16` 消息长度。
pub const HEADER_BITS: usize = 16;

/// 头部能够表示的最大消息长度 (字节)。
pub const MAX_MESSAGE_LEN: usize = u16::MAX as usize;

/// bits-per-channel 的合法下界。
pub const MIN_BITS_PER_CHANNEL: u8 = 1;

/// bits-per-channel 的合法上界。
pub const MAX_BITS_PER_CHANNEL: u8 = 8;

/// 未指定输出路径时，隐写结果图像文件名的前缀。
pub const EMBEDDED_PREFIX: &str = "embedded_";

/// 位平面图的默认标签。
pub const DEFAULT_LABEL: &str = "map";

/// 默认暂存目录名 (位于系统临时目录下)。
pub const STAGING_DIR_NAME: &str = "lsb_plane";
