mod common;

use std::path::Path;

use common::{fake_dds, fake_pvr, fake_tex0, pattern, FakeTools};
use ghimg::{
    batch,
    convert::{convert, ConvertOptions, ConvertRequest},
    extract::{extract, inspect, ExtractOptions},
    format::{Game, ImgError, ImgFormat, Platform},
    texture::{tex0, DdsFormat, Tex0Format, Texture},
};

fn options(platform: Platform, game: Game, texture: Option<Texture>, mips: u32) -> ConvertOptions {
    ConvertOptions {
        format: ImgFormat::from_platform_and_game(platform, game).unwrap(),
        texture,
        mip_count: mips,
        resize: None,
        flip: false,
    }
}

fn request(dir: &Path, options: ConvertOptions) -> ConvertRequest {
    ConvertRequest {
        source: dir.join("cover.png"),
        dest: dir.join("cover.img"),
        options,
    }
}

fn native_only(platform_hint: Option<Platform>) -> ExtractOptions {
    ExtractOptions {
        platform_hint,
        native_only: true,
    }
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn ps3_bc1_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let tools = FakeTools::new(64, 32);

    let request = request(dir.path(), options(Platform::Ps3, Game::Ghl, None, 1));
    let report = convert(&tools, &request).unwrap();
    assert_eq!((report.width, report.height), (64, 32));
    assert_eq!(report.texture, Texture::Dds(DdsFormat::Bc1));
    assert_eq!(*tools.calls.borrow(), ["compress BC1"]);

    let img = std::fs::read(&request.dest).unwrap();
    assert_eq!(img.len(), 20 + 16 * 8 * 8);
    assert_eq!(
        &img[..20],
        &[
            0x00, 0x40, 0x00, 0x20, 0x00, 0x01, 0x00, 0x40, 0x00, 0x00, 0x00, 0x05, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00, 0x03, 0x01
        ]
    );
    assert_eq!(file_names(dir.path()), ["cover.img"]);

    let extracted = extract(
        &tools,
        &request.dest,
        &dir.path().join("cover.png"),
        native_only(None),
    )
    .unwrap();
    assert_eq!(extracted.output, dir.path().join("cover.dds"));
    assert_eq!(
        std::fs::read(&extracted.output).unwrap(),
        fake_dds(64, 32, 1, DdsFormat::Bc1)
    );
}

#[test]
fn x360_rgba_payload_is_reordered_and_swapped() {
    let dir = tempfile::tempdir().unwrap();
    let tools = FakeTools::new(8, 8);
    let rgba = Texture::Dds(DdsFormat::R8G8B8A8);

    let request = request(dir.path(), options(Platform::X360, Game::Ghl, Some(rgba), 1));
    convert(&tools, &request).unwrap();
    assert_eq!(*tools.calls.borrow(), ["compress r8g8b8a8"]);

    let img = std::fs::read(&request.dest).unwrap();
    // RGBA -> ABGR, then 16-bit swapped
    let rgba = pattern(4);
    assert_eq!(&img[20..24], &[rgba[2], rgba[3], rgba[0], rgba[1]]);

    let extracted = extract(
        &tools,
        &request.dest,
        &dir.path().join("cover.png"),
        native_only(None),
    )
    .unwrap();
    assert_eq!(
        std::fs::read(extracted.output).unwrap(),
        fake_dds(8, 8, 1, DdsFormat::R8G8B8A8)
    );
}

#[test]
fn pc_rgba_payload_is_reordered() {
    let dir = tempfile::tempdir().unwrap();
    let tools = FakeTools::new(8, 8);
    let rgba = Texture::Dds(DdsFormat::R8G8B8A8);

    let request = request(dir.path(), options(Platform::Pc, Game::Ghl, Some(rgba), 1));
    convert(&tools, &request).unwrap();

    let img = std::fs::read(&request.dest).unwrap();
    let pixel = pattern(4);
    assert_eq!(&img[20..24], &[pixel[3], pixel[2], pixel[1], pixel[0]]);

    let extracted = extract(
        &tools,
        &request.dest,
        &dir.path().join("cover.png"),
        native_only(None),
    )
    .unwrap();
    assert_eq!(
        std::fs::read(extracted.output).unwrap(),
        fake_dds(8, 8, 1, DdsFormat::R8G8B8A8)
    );
}

#[test]
fn resize_sets_the_header_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let tools = FakeTools::new(256, 256);

    let mut options = options(Platform::Pc, Game::Ghl, Some(DdsFormat::Bc3.into()), 2);
    options.resize = Some((32, 16));
    let request = request(dir.path(), options);
    let report = convert(&tools, &request).unwrap();

    assert_eq!((report.width, report.height), (32, 16));
    let info = inspect(&std::fs::read(&request.dest).unwrap(), None).unwrap();
    assert_eq!(info.platform(), Platform::Pc);
    assert_eq!((info.width, info.height), (32, 16));
    assert_eq!(info.mip_count, 2);
    assert_eq!(info.texture, Texture::Dds(DdsFormat::Bc3));
}

#[test]
fn wii_u_reframes_the_gtx_file() {
    let dir = tempfile::tempdir().unwrap();
    let tools = FakeTools::new(64, 64);

    let request = request(dir.path(), options(Platform::WiiU, Game::Ghl, None, 1));
    convert(&tools, &request).unwrap();
    assert_eq!(*tools.calls.borrow(), ["compress BC1", "dds_to_gtx"]);

    let img = std::fs::read(&request.dest).unwrap();
    let surface = 16 * 16 * 8;
    assert_eq!(img.len(), 220 + surface);
    assert_eq!(&img[18..20], &[0x03, 0x04]);
    assert!(img[20..32].iter().all(|&b| b == 0x11));
    assert!(img[32..188].iter().all(|&b| b == 0x33));
    assert_eq!(&img[220..], &pattern(surface)[..]);
    assert_eq!(file_names(dir.path()), ["cover.img"]);

    let info = inspect(&img, None).unwrap();
    assert_eq!(info.platform(), Platform::WiiU);
    assert_eq!((info.width, info.height), (64, 64));

    let err = extract(
        &tools,
        &request.dest,
        &dir.path().join("cover.png"),
        native_only(None),
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ImgError>(),
        Some(ImgError::UnsupportedPlatform(Platform::WiiU))
    ));
}

#[test]
fn ios_keeps_the_pvr_file_minus_metadata() {
    let dir = tempfile::tempdir().unwrap();
    let tools = FakeTools::new(512, 512);

    let request = request(dir.path(), options(Platform::Ios, Game::Ghl, None, 1));
    convert(&tools, &request).unwrap();
    assert_eq!(*tools.calls.borrow(), ["compress PVRTC1_4_RGB"]);

    let img = std::fs::read(&request.dest).unwrap();
    assert_eq!(
        &img[..20],
        &[
            0x00, 0x02, 0x00, 0x02, 0x01, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x01, 0x00, 0x00, 0x06
        ]
    );

    let pvr = fake_pvr(512, 512, 1);
    assert_eq!(img.len(), 20 + pvr.len() - 24);
    assert_eq!(&img[20..24], b"PVR\x03");
    assert_eq!(&img[68..72], &15u32.to_le_bytes());
    assert_eq!(&img[72..87], &[0xEE; 15]);
    assert_eq!(&img[87..], &pvr[91..]);

    let extracted = extract(
        &tools,
        &request.dest,
        &dir.path().join("cover.png"),
        native_only(None),
    )
    .unwrap();
    assert_eq!(extracted.output, dir.path().join("cover.pvr"));
    assert_eq!(std::fs::read(extracted.output).unwrap(), &img[20..]);
}

#[test]
fn wii_folds_the_tex0_header_into_the_img_header() {
    let dir = tempfile::tempdir().unwrap();
    let tools = FakeTools::new(16, 16);

    let request = request(dir.path(), options(Platform::Wii, Game::Djh, None, 2));
    let report = convert(&tools, &request).unwrap();
    assert_eq!(report.texture, Texture::Tex0(Tex0Format::Cmpr));
    assert_eq!(*tools.calls.borrow(), ["tex0_encode 2"]);

    let img = std::fs::read(&request.dest).unwrap();
    let chain = 4 * 32 + 32;
    assert_eq!(img.len(), 64 + chain);

    let tex0_header = tex0::build_tex0_header(16, 16, 2, Tex0Format::Cmpr).unwrap();
    assert_eq!(&img[20..64], &tex0_header[20..]);
    assert_eq!(&img[8..12], &[0x00, 0x00, 0x00, 0x0E]);

    // DJ Hero headers need the platform to be told
    assert!(extract(
        &tools,
        &request.dest,
        &dir.path().join("cover.png"),
        native_only(None),
    )
    .is_err());

    let extracted = extract(
        &tools,
        &request.dest,
        &dir.path().join("cover.png"),
        native_only(Some(Platform::Wii)),
    )
    .unwrap();
    assert_eq!(extracted.output, dir.path().join("cover.tex0"));

    let mut expected = fake_tex0(16, 16, 2, Tex0Format::Cmpr);
    expected.truncate(64 + chain);
    assert_eq!(std::fs::read(extracted.output).unwrap(), expected);
}

#[test]
fn extraction_runs_the_decoder_and_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let tools = FakeTools::new(64, 64);

    let request = request(dir.path(), options(Platform::X1, Game::Ghl, None, 1));
    convert(&tools, &request).unwrap();

    let dest = dir.path().join("out.png");
    let extracted = extract(&tools, &request.dest, &dest, ExtractOptions::default()).unwrap();
    assert_eq!(extracted.output, dest);
    assert_eq!(extracted.info.platform(), Platform::X1);

    let image = std::fs::read(&dest).unwrap();
    assert_eq!(&image[..4], b"\x89PNG");
    assert_eq!(&image[4..], &fake_dds(64, 64, 1, DdsFormat::Bc1)[..]);
    assert_eq!(file_names(dir.path()), ["cover.img", "out.png"]);
}

#[test]
fn incompatible_texture_fails_before_any_tool_runs() {
    let dir = tempfile::tempdir().unwrap();
    let tools = FakeTools::new(64, 64);

    let request = request(
        dir.path(),
        options(Platform::Ios, Game::Ghl, Some(DdsFormat::Bc1.into()), 1),
    );
    let err = convert(&tools, &request).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ImgError>(),
        Some(ImgError::IncompatibleTexture { .. })
    ));
    assert!(tools.calls.borrow().is_empty());
}

#[test]
fn batch_convert_and_extract() {
    let dir = tempfile::tempdir().unwrap();
    let tools = FakeTools::new(32, 32);
    std::fs::create_dir(dir.path().join("songs")).unwrap();
    std::fs::write(dir.path().join("a.png"), b"").unwrap();
    std::fs::write(dir.path().join("songs/b.jpg"), b"").unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"hello").unwrap();

    let report = batch::convert_dir(
        &tools,
        dir.path(),
        &options(Platform::X360, Game::Ghl, None, 1),
    )
    .unwrap();
    assert_eq!(report.processed, 2);
    assert!(report.skipped.is_empty());
    assert!(dir.path().join("a.img").is_file());
    assert!(dir.path().join("songs/b.img").is_file());

    let report = batch::extract_dir(&tools, dir.path(), native_only(None)).unwrap();
    assert_eq!(report.processed, 2);
    assert_eq!(report.skipped, [dir.path().join("notes.txt")]);
    assert_eq!(
        std::fs::read(dir.path().join("a.dds")).unwrap(),
        fake_dds(32, 32, 1, DdsFormat::Bc1)
    );
}
