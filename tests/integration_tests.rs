use bmp_shadow::{
    BmpFile, StegoError,
    cli::{ExposeArgs, HideArgs},
    handler::{handle_expose, handle_hide},
};
use image::{ImageBuffer, Rgb, Rgba};
use rand::RngCore;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// 一个辅助函数，用于创建一个带有随机像素的 24 位 BMP 测试图像
fn create_test_image(path: &Path, width: u32, height: u32) {
    let mut raw_pixels = vec![0u8; (width * height * 3) as usize];
    rand::rng().fill_bytes(&mut raw_pixels);

    let img_buf: ImageBuffer<Rgb<u8>, _> =
        ImageBuffer::from_raw(width, height, raw_pixels).expect("Buffer size mismatch.");
    img_buf.save(path).expect("Failed to create test image.");
}

/// 创建一个 32 位 BMP 测试图像，其信息头比 24 位图像更长
fn create_test_image_with_alpha(path: &Path, width: u32, height: u32) {
    let mut raw_pixels = vec![0u8; (width * height * 4) as usize];
    rand::rng().fill_bytes(&mut raw_pixels);

    let img_buf: ImageBuffer<Rgba<u8>, _> =
        ImageBuffer::from_raw(width, height, raw_pixels).expect("Buffer size mismatch.");
    img_buf.save(path).expect("Failed to create test image.");
}

fn random_message(len: usize) -> Vec<u8> {
    let mut message = vec![0u8; len];
    rand::rng().fill_bytes(&mut message);
    message
}

/// 验证从隐藏到取出的完整流程
#[test]
fn test_handle_hide_and_expose_integration() -> anyhow::Result<()> {
    // 1. 准备环境
    let dir = tempdir()?;
    let original_image_path = dir.path().join("original.bmp");
    let hidden_image_path = dir.path().join("hidden.bmp");
    let source_message_path = dir.path().join("source.txt");
    let exposed_message_path = dir.path().join("exposed.txt");

    create_test_image(&original_image_path, 100, 100);
    let original_text = "This is a test message for the handler! 这是一个给处理器的测试信息！";
    fs::write(&source_message_path, original_text)?;

    // 2. 测试 handle_hide
    let hide_args = HideArgs {
        image: original_image_path.clone(),
        message: source_message_path.clone(),
        dest: Some(hidden_image_path.clone()),
        bits_per_byte: 1,
        force: false,
    };
    handle_hide(hide_args)?;
    assert!(
        hidden_image_path.exists(),
        "Hidden image should be created."
    );

    // 隐写后的文件仍是合法的 BMP 图像
    let decoded = image::open(&hidden_image_path)?;
    assert_eq!((decoded.width(), decoded.height()), (100, 100));

    // 3. 测试 handle_expose
    let expose_args = ExposeArgs {
        image: hidden_image_path.clone(),
        message: Some(exposed_message_path.clone()),
        force: false,
    };
    handle_expose(expose_args)?;
    assert!(
        exposed_message_path.exists(),
        "Exposed message file should be created."
    );

    // 4. 验证结果
    let exposed_text = fs::read_to_string(&exposed_message_path)?;
    assert_eq!(
        original_text, exposed_text,
        "Exposed message must match the original."
    );

    Ok(())
}

/// 验证当用户不提供输出路径时，是否能正确生成默认路径并完成操作
#[test]
fn test_handle_hide_and_expose_with_defaults() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let original_image_path = dir.path().join("original.bmp");
    let source_message_path = dir.path().join("source.bin");

    create_test_image(&original_image_path, 64, 32);
    let original_message = random_message(500);
    fs::write(&source_message_path, &original_message)?;

    let hide_args = HideArgs {
        image: original_image_path.clone(),
        message: source_message_path.clone(),
        dest: None,
        bits_per_byte: 2,
        force: false,
    };
    handle_hide(hide_args)?;

    let expected_hidden_path = dir.path().join("doctored_original.bmp");
    assert!(
        expected_hidden_path.exists(),
        "Default hidden image should be created at: {:?}",
        expected_hidden_path
    );

    let expose_args = ExposeArgs {
        image: expected_hidden_path,
        message: None,
        force: false,
    };
    handle_expose(expose_args)?;

    let expected_exposed_path = dir.path().join("recovered_doctored_original.bin");
    assert!(
        expected_exposed_path.exists(),
        "Default exposed message file should be created at: {:?}",
        expected_exposed_path
    );
    assert_eq!(fs::read(&expected_exposed_path)?, original_message);

    Ok(())
}

/// 验证所有合法的 bits-per-byte 在经过文件往返后都能完整取出消息
#[test]
fn test_round_trip_through_files_for_every_width() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("cover.bmp");
    let message_path = dir.path().join("message.bin");
    create_test_image(&image_path, 40, 40);

    let message = random_message(300);
    fs::write(&message_path, &message)?;

    for bits_per_byte in [1u8, 2, 4, 8] {
        let hidden_path = dir.path().join(format!("hidden_{bits_per_byte}.bmp"));
        let exposed_path = dir.path().join(format!("exposed_{bits_per_byte}.bin"));

        handle_hide(HideArgs {
            image: image_path.clone(),
            message: message_path.clone(),
            dest: Some(hidden_path.clone()),
            bits_per_byte,
            force: false,
        })?;
        handle_expose(ExposeArgs {
            image: hidden_path,
            message: Some(exposed_path.clone()),
            force: false,
        })?;

        assert_eq!(
            fs::read(&exposed_path)?,
            message,
            "Round trip failed at {bits_per_byte} bits per byte."
        );
    }

    Ok(())
}

/// 验证较长的信息头 (32 位图像) 在隐写前后被原样保留
#[test]
fn test_extra_headers_are_preserved() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("alpha.bmp");
    create_test_image_with_alpha(&image_path, 20, 20);

    let original = fs::read(&image_path)?;
    let mut bmp = BmpFile::open(&image_path)?;
    assert!(!bmp.has_message());
    assert!(bmp.pixel_array_offset() > 54);
    assert_eq!(
        bmp.to_bytes(),
        original,
        "Unmodified re-save must be identical."
    );

    let message = random_message(bmp.capacity());
    bmp_shadow::hide(&mut bmp, &message, 4)?;

    let hidden = bmp.to_bytes();
    assert_eq!(hidden.len(), original.len());
    assert_eq!(&hidden[..6], &original[..6]);
    let offset = bmp.pixel_array_offset() as usize;
    assert_eq!(&hidden[10..offset], &original[10..offset]);

    let mut reparsed = BmpFile::parse(&hidden)?;
    assert_eq!(reparsed.message_length(), message.len());
    assert_eq!(bmp_shadow::expose(&mut reparsed)?, message);
    assert!(!reparsed.has_message());

    Ok(())
}

/// 验证覆盖保护机制以及 `--force` 标志是否按预期工作
#[test]
fn test_overwrite_protection_and_force_flag() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("image.bmp");
    let message_path = dir.path().join("message.txt");
    let dest_path = dir.path().join("dest.bmp");

    create_test_image(&image_path, 50, 50);
    fs::write(&message_path, "some text")?;

    // 场景一：目标文件已存在，不使用 --force
    fs::write(&dest_path, "this is a dummy file to be overwritten")?;

    let result = handle_hide(HideArgs {
        image: image_path.clone(),
        message: message_path.clone(),
        dest: Some(dest_path.clone()),
        bits_per_byte: 1,
        force: false,
    });
    assert!(result.is_err(), "Execution should fail without --force when file exists.");
    if let Err(e) = result {
        assert!(e.to_string().contains("Output file already exists"));
    }

    // 场景二：使用 --force 强制覆盖
    handle_hide(HideArgs {
        image: image_path.clone(),
        message: message_path.clone(),
        dest: Some(dest_path.clone()),
        bits_per_byte: 1,
        force: true,
    })?;
    let dummy_content = fs::read(&dest_path)?;
    assert_ne!(dummy_content, b"this is a dummy file to be overwritten");

    // 场景三：图像中已有消息，不使用 --force
    let second_dest = dir.path().join("second.bmp");
    let result = handle_hide(HideArgs {
        image: dest_path.clone(),
        message: message_path.clone(),
        dest: Some(second_dest.clone()),
        bits_per_byte: 1,
        force: false,
    });
    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("already has a message"));
    }
    assert!(!second_dest.exists());

    // 场景四：expose 的输出路径是目录
    let result = handle_expose(ExposeArgs {
        image: dest_path,
        message: Some(dir.path().to_path_buf()),
        force: true,
    });
    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("is a directory"));
    }

    Ok(())
}

/// 验证空间不足时的错误处理
#[test]
fn test_handle_hide_not_enough_space() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("small.bmp");
    let message_path = dir.path().join("large.txt");
    let dest_path = dir.path().join("dest.bmp");

    // 10x10 的 24 位图像只有 320 字节像素数据，最多容纳 40 字节
    create_test_image(&image_path, 10, 10);
    fs::write(&message_path, "a".repeat(5000))?;

    let result = handle_hide(HideArgs {
        image: image_path,
        message: message_path,
        dest: Some(dest_path.clone()),
        bits_per_byte: 1,
        force: false,
    });

    let err = result.expect_err("Hiding 5000 bytes in a 10x10 image should fail.");
    assert!(matches!(
        err.downcast_ref::<StegoError>(),
        Some(StegoError::InsufficientCapacity { required: 40000, .. })
    ));
    assert!(!dest_path.exists(), "No output should be left behind.");

    Ok(())
}

/// 验证非法的 bits-per-byte 在命令行层被拒绝
#[test]
fn test_handle_hide_rejects_non_power_of_two() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("image.bmp");
    let message_path = dir.path().join("message.txt");
    create_test_image(&image_path, 20, 20);
    fs::write(&message_path, "hi")?;

    for bits_per_byte in [0u8, 3, 6, 9] {
        let result = handle_hide(HideArgs {
            image: image_path.clone(),
            message: message_path.clone(),
            dest: Some(dir.path().join("out.bmp")),
            bits_per_byte,
            force: true,
        });
        assert!(result.is_err(), "{bits_per_byte} bits per byte should be rejected.");
        if let Err(e) = result {
            assert!(e.to_string().contains("power of 2"));
        }
    }

    Ok(())
}

/// 验证从没有隐藏消息的图像中取出时报错，以及非 BMP 文件被拒绝
#[test]
fn test_handle_expose_without_message_and_invalid_files() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let image_path = dir.path().join("clean.bmp");
    let not_bmp_path = dir.path().join("not_a_bitmap.bmp");
    create_test_image(&image_path, 16, 16);
    fs::write(&not_bmp_path, b"\x89PNG\r\n\x1a\n0000000000000000")?;

    let result = handle_expose(ExposeArgs {
        image: image_path,
        message: Some(dir.path().join("out.bin")),
        force: false,
    });
    assert!(result.is_err());
    if let Err(e) = result {
        assert!(e.to_string().contains("does not contain a hidden message"));
    }

    let result = handle_expose(ExposeArgs {
        image: not_bmp_path,
        message: Some(dir.path().join("out.bin")),
        force: false,
    });
    let err = result.expect_err("A PNG signature is not a bitmap magic.");
    assert!(matches!(
        err.downcast_ref::<StegoError>(),
        Some(StegoError::InvalidMagic)
    ));

    let result = handle_expose(ExposeArgs {
        image: dir.path().join("missing.bmp"),
        message: Some(dir.path().join("out.bin")),
        force: false,
    });
    assert!(result.is_err());

    Ok(())
}
