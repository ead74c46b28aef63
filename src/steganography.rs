//! # 隐写核心算法模块
//!
//! ## 载体布局
//!
//! * 前 [`HEADER_BITS`] 个通道样本：消息长度 (大端序 `u16`)，MSB 优先，每个样本只占用 bit 0。
//! * 之后的样本：消息字节按 MSB 优先拆成若干组，每组 `bits_per_channel` 位，
//!   依次写入后续样本的低位 (像素内按通道顺序，像素间按行优先)。
//! * 载荷之后的样本保持不变；最后一组不足 `bits_per_channel` 位时，只改写实际携带数据的位。
//!
//! `bits_per_channel` 本身不写入载体，提取时必须由调用方提供相同的值。

use crate::capacity::{EmbedConfig, capacity_bits, validate};
use crate::constants::HEADER_BITS;
use crate::error::{Result, StegoError};
use crate::raster::Raster;
use log::{debug, warn};

/// 把 `data` 的比特流写入 `pix` 中从第 `dix` 个样本开始的区域，每个样本写入低 `bits` 位。
///
/// 比特按 MSB 优先排列；组内第一个比特落在样本的第 `bits - 1` 位。
pub fn modify(data: &[u8], pix: &mut [u8], dix: usize, bits: u8) -> Result<()> {
    let total_bits = data.len() * 8;
    check_region(pix.len(), dix, total_bits, bits)?;

    let bits = bits as usize;
    for k in 0..total_bits {
        let bit = (data[k / 8] >> (7 - k % 8)) & 1;
        let sample = &mut pix[dix + k / bits];
        let shift = bits - 1 - k % bits;
        *sample = (*sample & !(1 << shift)) | (bit << shift);
    }

    Ok(())
}

/// [`modify`] 的逆操作：从第 `dix` 个样本开始，按每样本 `bits` 位读出 `len` 字节。
pub fn recover(pix: &[u8], dix: usize, bits: u8, len: usize) -> Result<Vec<u8>> {
    let total_bits = len * 8;
    check_region(pix.len(), dix, total_bits, bits)?;

    let bits = bits as usize;
    let mut result = vec![0u8; len];
    for k in 0..total_bits {
        let shift = bits - 1 - k % bits;
        let bit = (pix[dix + k / bits] >> shift) & 1;
        result[k / 8] |= bit << (7 - k % 8);
    }

    Ok(result)
}

/// 写入 `total_bits` 所需的样本数。
fn samples_needed(total_bits: usize, bits: u8) -> usize {
    total_bits.div_ceil(bits as usize)
}

fn check_region(len: usize, dix: usize, total_bits: usize, bits: u8) -> Result<()> {
    let needed = samples_needed(total_bits, bits);
    if dix.checked_add(needed).is_none_or(|end| end > len) {
        return Err(StegoError::CapacityExceeded {
            required: total_bits,
            available: len.saturating_sub(dix) * bits as usize,
        });
    }
    Ok(())
}

/// 将消息写入光栅的低位，返回新的光栅；输入光栅保持不变。
///
/// # Errors
///
/// * 消息为空时返回 `EmptyMessage`。
/// * `bits_per_channel` 不在 `[1, 8]` 内时返回 `InvalidConfig`。
/// * 载体容量不足时返回 `CapacityExceeded`。
pub fn embed(raster: &Raster, message: &[u8], bits_per_channel: u8) -> Result<Raster> {
    if message.is_empty() {
        return Err(StegoError::EmptyMessage);
    }

    let config = validate(raster, bits_per_channel, message.len())?;
    // validate 已保证长度不超过 u16::MAX
    let header = (message.len() as u16).to_be_bytes();

    let mut samples = raster.samples().to_vec();
    modify(&header, &mut samples, 0, 1)?;
    modify(message, &mut samples, HEADER_BITS, config.bits_per_channel())?;

    debug!(
        "embedded {} bytes at {} bits per channel into {} samples",
        message.len(),
        config.bits_per_channel(),
        HEADER_BITS + samples_needed(message.len() * 8, config.bits_per_channel())
    );

    Ok(raster.with_samples(samples))
}

/// 从光栅中读出隐藏的消息。
///
/// # Errors
///
/// * `bits_per_channel` 不在 `[1, 8]` 内时返回 `InvalidConfig`。
/// * 头部无法读取、解码出的长度为 0，或长度超出载体容量时返回 `CorruptHeader`。
///   这通常意味着载体从未被写入、写入时使用了不同的 `bits_per_channel`，或经过了有损处理。
/// * 恢复出的字节不是合法的 UTF-8 时返回 `InvalidEncoding`。
pub fn extract(raster: &Raster, bits_per_channel: u8) -> Result<String> {
    let config = EmbedConfig::new(bits_per_channel)?;
    let capacity = capacity_bits(raster, config);

    let length = read_header(raster.samples()).ok_or(StegoError::CorruptHeader {
        length: 0,
        capacity,
    })?;

    if length == 0 || length * 8 > capacity {
        warn!("rejecting carrier: header length {length} bytes, capacity {capacity} bits");
        return Err(StegoError::CorruptHeader { length, capacity });
    }

    let bytes = recover(raster.samples(), HEADER_BITS, config.bits_per_channel(), length)?;
    debug!(
        "recovered {length} bytes at {} bits per channel",
        config.bits_per_channel()
    );

    Ok(String::from_utf8(bytes)?)
}

/// 读取固定速率的长度头部；样本数不足时返回 `None`。
fn read_header(pix: &[u8]) -> Option<usize> {
    let header = recover(pix, 0, 1, HEADER_BITS / 8).ok()?;
    Some(u16::from_be_bytes([header[0], header[1]]) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::ChannelLayout;

    fn filled(width: u32, height: u32, layout: ChannelLayout, value: u8) -> Raster {
        let len = width as usize * height as usize * layout.count();
        Raster::new(width, height, layout, vec![value; len]).unwrap()
    }

    #[test]
    fn modify_and_recover_two_bits() {
        let mut pix = vec![0u8; 8];
        modify(&[0b1101_0010, 0b0111_1000], &mut pix, 0, 2).unwrap();
        assert_eq!(pix, vec![0b11, 0b01, 0b00, 0b10, 0b01, 0b11, 0b10, 0b00]);
        assert_eq!(recover(&pix, 0, 2, 2).unwrap(), vec![0b1101_0010, 0b0111_1000]);
    }

    #[test]
    fn modify_rejects_region_past_end() {
        let mut pix = vec![0u8; 7];
        let result = modify(&[0xFF], &mut pix, 0, 1);
        assert!(matches!(result, Err(StegoError::CapacityExceeded { .. })));
        assert!(recover(&pix, 4, 1, 1).is_err());
    }

    #[test]
    fn hi_in_blank_four_by_four_rgb() {
        let raster = filled(4, 4, ChannelLayout::Rgb, 0);
        let encoded = embed(&raster, b"Hi", 1).unwrap();
        let samples = encoded.samples();

        // 长度 2 => 0000_0000_0000_0010
        let mut header = [0u8; HEADER_BITS];
        header[14] = 1;
        assert_eq!(&samples[..HEADER_BITS], &header);

        // 'H' = 0x48, 'i' = 0x69
        assert_eq!(&samples[16..24], &[0, 1, 0, 0, 1, 0, 0, 0]);
        assert_eq!(&samples[24..32], &[0, 1, 1, 0, 1, 0, 0, 1]);
        assert!(samples[32..].iter().all(|&s| s == 0));

        assert_eq!(extract(&encoded, 1).unwrap(), "Hi");
    }

    #[test]
    fn partial_final_group_keeps_untouched_bits() {
        let raster = filled(4, 4, ChannelLayout::Rgb, 0xFF);
        let encoded = embed(&raster, b"Hh", 3).unwrap();
        let samples = encoded.samples();

        let mut header = [0xFEu8; HEADER_BITS];
        header[14] = 0xFF;
        assert_eq!(&samples[..HEADER_BITS], &header);

        // 0x48 0x68 => 010 010 000 110 100 0
        assert_eq!(&samples[16..22], &[0xFA, 0xFA, 0xF8, 0xFE, 0xFC, 0xFB]);
        assert!(samples[22..].iter().all(|&s| s == 0xFF));

        assert_eq!(extract(&encoded, 3).unwrap(), "Hh");
    }

    #[test]
    fn round_trip_every_bit_depth() {
        let samples: Vec<u8> = (0..32 * 32 * 4).map(|i| (i * 31 % 251) as u8).collect();
        let raster = Raster::new(32, 32, ChannelLayout::Rgba, samples).unwrap();
        let message = "Round trip через все глубины 🎯";

        for bits in 1..=8 {
            let encoded = embed(&raster, message.as_bytes(), bits).unwrap();
            assert_eq!(extract(&encoded, bits).unwrap(), message, "bits = {bits}");
        }
    }

    #[test]
    fn embed_does_not_touch_upper_bits_or_tail() {
        let samples: Vec<u8> = (0..10 * 10 * 3).map(|i| (i % 256) as u8).collect();
        let raster = Raster::new(10, 10, ChannelLayout::Rgb, samples).unwrap();
        let message = b"upper bits stay";
        let bits = 3;
        let encoded = embed(&raster, message, bits).unwrap();

        let payload_end = HEADER_BITS + samples_needed(message.len() * 8, bits);
        for (i, (&before, &after)) in raster.samples().iter().zip(encoded.samples()).enumerate() {
            if i < HEADER_BITS {
                assert_eq!(before & !1, after & !1, "header sample {i}");
            } else if i < payload_end {
                assert_eq!(before & !0b111, after & !0b111, "payload sample {i}");
            } else {
                assert_eq!(before, after, "tail sample {i}");
            }
        }
    }

    #[test]
    fn embed_leaves_input_intact() {
        let raster = filled(8, 8, ChannelLayout::Rgb, 0x55);
        let copy = raster.clone();
        let _ = embed(&raster, b"copy semantics", 2).unwrap();
        assert_eq!(raster, copy);
    }

    #[test]
    fn capacity_boundary_is_exact() {
        // 48 个样本，1 bit 容量 32 bits = 4 字节
        let raster = filled(4, 4, ChannelLayout::Rgb, 0x80);
        let fits = embed(&raster, b"abcd", 1).unwrap();
        assert_eq!(extract(&fits, 1).unwrap(), "abcd");

        assert!(matches!(
            embed(&raster, b"abcde", 1),
            Err(StegoError::CapacityExceeded { required: 40, available: 32 })
        ));
    }

    #[test]
    fn capacity_boundary_at_wider_bit_depths() {
        // 头部仍占 16 个样本，剩余 32 个样本每个提供 bits 位
        let raster = filled(4, 4, ChannelLayout::Rgb, 0x5A);

        let full = "w".repeat(32);
        let encoded = embed(&raster, full.as_bytes(), 8).unwrap();
        assert_eq!(extract(&encoded, 8).unwrap(), full);
        assert!(matches!(
            embed(&raster, "w".repeat(33).as_bytes(), 8),
            Err(StegoError::CapacityExceeded { required: 264, available: 256 })
        ));

        let full = "t".repeat(12);
        let encoded = embed(&raster, full.as_bytes(), 3).unwrap();
        assert_eq!(extract(&encoded, 3).unwrap(), full);
        assert!(matches!(
            embed(&raster, "t".repeat(13).as_bytes(), 3),
            Err(StegoError::CapacityExceeded { required: 104, available: 96 })
        ));
    }

    #[test]
    fn config_boundary() {
        let raster = filled(8, 8, ChannelLayout::Rgba, 0x10);
        assert!(matches!(embed(&raster, b"x", 0), Err(StegoError::InvalidConfig(0))));
        assert!(matches!(embed(&raster, b"x", 9), Err(StegoError::InvalidConfig(9))));
        assert!(matches!(extract(&raster, 0), Err(StegoError::InvalidConfig(0))));
        assert!(matches!(extract(&raster, 9), Err(StegoError::InvalidConfig(9))));

        for bits in [1, 8] {
            let encoded = embed(&raster, b"edge", bits).unwrap();
            assert_eq!(extract(&encoded, bits).unwrap(), "edge");
        }
    }

    #[test]
    fn empty_message_is_rejected() {
        let raster = filled(4, 4, ChannelLayout::Rgb, 0);
        for bits in [0, 1, 4, 8, 9] {
            assert!(matches!(embed(&raster, b"", bits), Err(StegoError::EmptyMessage)));
        }
    }

    #[test]
    fn mismatched_bit_depth_is_detected() {
        // 8 bits 下 (48 - 16) * 8 = 256 bits，写入 30 字节
        let raster = filled(4, 4, ChannelLayout::Rgb, 0);
        let message = "x".repeat(30);
        let encoded = embed(&raster, message.as_bytes(), 8).unwrap();

        for bits in 1..=3 {
            assert!(matches!(
                extract(&encoded, bits),
                Err(StegoError::CorruptHeader { length: 30, .. })
            ));
        }
    }

    #[test]
    fn non_utf8_payload_is_invalid_encoding() {
        let raster = filled(8, 8, ChannelLayout::Rgb, 0);
        let encoded = embed(&raster, &[0xFF, 0xFE, 0x41], 2).unwrap();
        assert!(matches!(extract(&encoded, 2), Err(StegoError::InvalidEncoding(_))));
    }

    #[test]
    fn unencoded_carriers_are_corrupt() {
        // 所有低位为 1 => 长度 65535，远超容量
        let saturated = filled(8, 8, ChannelLayout::Rgb, 0xFF);
        assert!(matches!(
            extract(&saturated, 1),
            Err(StegoError::CorruptHeader { length: 65535, .. })
        ));

        let blank = filled(8, 8, ChannelLayout::Rgb, 0);
        assert!(matches!(
            extract(&blank, 1),
            Err(StegoError::CorruptHeader { length: 0, .. })
        ));

        let tiny = filled(1, 1, ChannelLayout::Rgba, 0);
        assert!(matches!(extract(&tiny, 1), Err(StegoError::CorruptHeader { .. })));
    }

    #[test]
    fn extraction_is_deterministic() {
        let raster = filled(6, 6, ChannelLayout::Rgb, 0x3C);
        let encoded = embed(&raster, b"same every time", 2).unwrap();
        assert_eq!(extract(&encoded, 2).unwrap(), extract(&encoded, 2).unwrap());
    }

    #[test]
    fn parallel_embeds_share_one_raster() {
        let raster = filled(16, 16, ChannelLayout::Rgba, 0x99);
        std::thread::scope(|scope| {
            let handles: Vec<_> = (1..=8u8)
                .map(|bits| {
                    let raster = &raster;
                    scope.spawn(move || {
                        let message = format!("worker {bits}");
                        let encoded = embed(raster, message.as_bytes(), bits).unwrap();
                        (message, extract(&encoded, bits).unwrap())
                    })
                })
                .collect();
            for handle in handles {
                let (sent, received) = handle.join().unwrap();
                assert_eq!(sent, received);
            }
        });
        assert!(raster.samples().iter().all(|&s| s == 0x99));
    }
}
