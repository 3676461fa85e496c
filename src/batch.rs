use std::path::{Path, PathBuf};

use ghimg_format::ImgError;
use ghimg_texture::TextureError;

use crate::{
    convert::{convert, ConvertOptions, ConvertRequest},
    extract::{extract, ExtractOptions},
    filetype::FileType,
    tools::Toolchain,
};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchReport {
    pub processed: usize,
    /// Files that turned out not to be in the expected format
    pub skipped: Vec<PathBuf>,
}

/// Converts every image under `dir` into an `.img` file next to it.
pub fn convert_dir(
    tools: &dyn Toolchain,
    dir: &Path,
    options: &ConvertOptions,
) -> anyhow::Result<BatchReport> {
    let files = collect_files(dir, |kind| kind == Some(FileType::Image))?;
    run_batch(files, |path| {
        let request = ConvertRequest {
            source: path.to_path_buf(),
            dest: path.with_extension(FileType::Img.extension()),
            options: options.clone(),
        };
        convert(tools, &request).map(|_| ())
    })
}

/// Extracts every file under `dir` that isn't an image or a native container.
pub fn extract_dir(
    tools: &dyn Toolchain,
    dir: &Path,
    options: ExtractOptions,
) -> anyhow::Result<BatchReport> {
    let files = collect_files(dir, |kind| {
        !kind.is_some_and(|k| k == FileType::Image || k.is_native())
    })?;
    run_batch(files, |path| {
        let dest = path.with_extension(FileType::Image.extension());
        extract(tools, path, &dest, options).map(|_| ())
    })
}

/// Whether an error only means that a file isn't what it was assumed to be.
pub fn is_format_detection(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        cause
            .downcast_ref::<ImgError>()
            .is_some_and(ImgError::is_format_detection)
            || cause
                .downcast_ref::<TextureError>()
                .is_some_and(TextureError::is_format_detection)
    })
}

// Collected up front, the batch writes new files into the same tree
fn collect_files(
    dir: &Path,
    filter: impl Fn(Option<FileType>) -> bool,
) -> anyhow::Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/**/*",
        glob::Pattern::escape(&dir.to_string_lossy())
    );

    let mut files: Vec<PathBuf> = glob::glob(&pattern)?
        .flatten()
        .filter(|p| p.is_file())
        .filter(|p| filter(FileType::guess_from_path(p)))
        .collect();
    files.sort();

    debug!("Found {} files under {}", files.len(), dir.display());
    Ok(files)
}

fn run_batch(
    files: Vec<PathBuf>,
    mut process: impl FnMut(&Path) -> anyhow::Result<()>,
) -> anyhow::Result<BatchReport> {
    let mut report = BatchReport::default();

    for path in files {
        match process(&path) {
            Ok(()) => report.processed += 1,
            Err(e) if is_format_detection(&e) => {
                error!("Skipping {}: {e:#}", path.display());
                report.skipped.push(path);
            }
            Err(e) => return Err(e.context(format!("Failed to process {}", path.display()))),
        }
    }

    info!(
        "Processed {} files, skipped {}",
        report.processed,
        report.skipped.len()
    );
    Ok(report)
}
