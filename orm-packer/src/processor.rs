/// Per-directory orchestration of the individual-map and packed-ORM flows.
use crate::channels::{
    ChannelRole, OrmConvention, TextureSet, convert_orm_texture, unpack_orm_texture,
};
use crate::config::RunConfiguration;
use crate::error::PackerError;
use crate::grouper::{DirectoryFileSet, FileRole};
use crate::texture_io::{load_rgb, load_rgba, save_rgb, save_rgba};
use constants::naming::{METALLIC_STEM_TOKEN, UNITY_ORM_TOKEN, UNITY_SUFFIX, UNREAL_ORM_TOKEN};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Result of combining AO, Roughness and Metallic maps in one directory.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IndividualOutcome {
    /// At least one of the three maps is absent. Informational only.
    Skipped { missing: Vec<ChannelRole> },
    Succeeded {
        written: Vec<PathBuf>,
        deleted: Vec<PathBuf>,
    },
    Failed { error: String },
}

/// Result of converting or decomposing one packed texture.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OrmFileOutcome {
    Succeeded {
        source: PathBuf,
        written: Vec<PathBuf>,
    },
    Failed {
        source: PathBuf,
        error: String,
    },
}

/// Result of the packed-ORM flow for one directory.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OrmFlowOutcome {
    /// No packed texture in the directory.
    Skipped,
    Processed { files: Vec<OrmFileOutcome> },
}

/// Everything that happened in one directory. Disabled flows are `None`.
#[derive(Debug, Clone, Serialize)]
pub struct DirectoryReport {
    pub dir: PathBuf,
    pub individual: Option<IndividualOutcome>,
    pub orm: Option<OrmFlowOutcome>,
}

impl DirectoryReport {
    /// Every file written in this directory, in write order.
    pub fn written(&self) -> Vec<&Path> {
        let mut written = Vec::new();
        if let Some(IndividualOutcome::Succeeded { written: files, .. }) = &self.individual {
            written.extend(files.iter().map(PathBuf::as_path));
        }
        if let Some(OrmFlowOutcome::Processed { files }) = &self.orm {
            for file in files {
                if let OrmFileOutcome::Succeeded {
                    written: outputs, ..
                } = file
                {
                    written.extend(outputs.iter().map(PathBuf::as_path));
                }
            }
        }
        written
    }

    pub fn failure_count(&self) -> usize {
        let individual = matches!(self.individual, Some(IndividualOutcome::Failed { .. })) as usize;
        let orm = match &self.orm {
            Some(OrmFlowOutcome::Processed { files }) => files
                .iter()
                .filter(|file| matches!(file, OrmFileOutcome::Failed { .. }))
                .count(),
            _ => 0,
        };
        individual + orm
    }
}

/// Applies the configured flows to one directory at a time.
/// Holds no mutable state, so one processor is shared by every worker.
pub struct DirectoryProcessor<'a> {
    config: &'a RunConfiguration,
}

impl<'a> DirectoryProcessor<'a> {
    pub fn new(config: &'a RunConfiguration) -> Self {
        Self { config }
    }

    /// Runs both flows for a directory. Failures are captured in the report.
    pub fn process(&self, files: &DirectoryFileSet) -> DirectoryReport {
        debug!(
            "Processing {} ({} files)",
            files.dir().display(),
            files.files().len()
        );
        let individual = self
            .config
            .process_individual
            .then(|| self.process_individual(files));
        let orm = self.config.process_orm.then(|| self.process_orm(files));

        DirectoryReport {
            dir: files.dir().to_path_buf(),
            individual,
            orm,
        }
    }

    fn process_individual(&self, files: &DirectoryFileSet) -> IndividualOutcome {
        let ao = files.find_role(FileRole::AmbientOcclusion);
        let roughness = files.find_role(FileRole::Roughness);
        let metallic = files.find_role(FileRole::Metallic);

        let (Some(ao), Some(roughness), Some(metallic)) = (ao, roughness, metallic) else {
            let missing = [
                (ChannelRole::AmbientOcclusion, ao),
                (ChannelRole::Roughness, roughness),
                (ChannelRole::Metallic, metallic),
            ]
            .into_iter()
            .filter(|(_, path)| path.is_none())
            .map(|(role, _)| role)
            .collect();

            warn!(
                "The folder {} does not contain all required individual maps (AO, Roughness, Metallic). Skipping individual texture processing.",
                files.dir().display()
            );
            return IndividualOutcome::Skipped { missing };
        };

        let sources = IndividualSources {
            dir: files.dir(),
            ao,
            roughness,
            metallic,
        };

        match self.pack_individual(&sources) {
            Ok((written, deleted)) => {
                info!(
                    "Processed individual textures in {} successfully!",
                    files.dir().display()
                );
                IndividualOutcome::Succeeded { written, deleted }
            }
            Err(err) => {
                error!(
                    "Error processing individual textures in {}: {}",
                    files.dir().display(),
                    err
                );
                IndividualOutcome::Failed {
                    error: err.to_string(),
                }
            }
        }
    }

    /// Writes every enabled output, then deletes the sources if asked.
    /// Any failed write returns before deletion, so sources survive.
    fn pack_individual(
        &self,
        sources: &IndividualSources,
    ) -> Result<(Vec<PathBuf>, Vec<PathBuf>), PackerError> {
        let set = TextureSet::new(
            load_rgba(sources.ao)?,
            load_rgba(sources.roughness)?,
            load_rgba(sources.metallic)?,
        )?;
        let mut written = Vec::new();

        if self.config.save_unity_smoothness_in_metallic {
            save_rgba(&set.metallic_with_smoothness(), sources.metallic)?;
            written.push(sources.metallic.to_path_buf());
        }

        if self.config.save_unreal_orm {
            let path = sources.packed_output(UNREAL_ORM_TOKEN, self.config.format.extension());
            save_rgb(&set.pack(OrmConvention::Unreal), &path)?;
            written.push(path);
        }

        if self.config.save_unity_orm {
            let path = sources.packed_output(UNITY_ORM_TOKEN, self.config.format.extension());
            save_rgb(&set.pack(OrmConvention::Unity), &path)?;
            written.push(path);
        }

        let mut deleted = Vec::new();
        if self.config.delete_non_orm_files {
            for path in [sources.roughness, sources.ao, sources.metallic] {
                if path.exists() {
                    fs::remove_file(path)?;
                    deleted.push(path.to_path_buf());
                }
            }
        }

        Ok((written, deleted))
    }

    fn process_orm(&self, files: &DirectoryFileSet) -> OrmFlowOutcome {
        let candidates = files.orm_candidates();

        if candidates.is_empty() {
            warn!(
                "The folder {} does not contain any ORM textures. Skipping ORM processing.",
                files.dir().display()
            );
            return OrmFlowOutcome::Skipped;
        }

        let outcomes = candidates
            .into_iter()
            .map(|source| self.process_orm_file(files.dir(), source))
            .collect();

        OrmFlowOutcome::Processed { files: outcomes }
    }

    fn process_orm_file(&self, dir: &Path, source: &Path) -> OrmFileOutcome {
        match self.convert_orm_file(dir, source) {
            Ok(written) => OrmFileOutcome::Succeeded {
                source: source.to_path_buf(),
                written,
            },
            Err(err) => {
                error!("Error processing ORM texture {}: {}", source.display(), err);
                OrmFileOutcome::Failed {
                    source: source.to_path_buf(),
                    error: err.to_string(),
                }
            }
        }
    }

    fn convert_orm_file(&self, dir: &Path, source: &Path) -> Result<Vec<PathBuf>, PackerError> {
        let packed = load_rgb(source)?;
        let stem = file_stem(source);
        let ext = self.config.format.extension();
        let convention = OrmConvention::from_unreal_flag(self.config.is_unreal_orm_format);
        let mut written = Vec::new();

        if convention == OrmConvention::Unreal {
            let path = dir.join(format!("{}{}.{}", stem, UNITY_SUFFIX, ext));
            save_rgb(&convert_orm_texture(&packed, convention), &path)?;
            info!(
                "Converted {} to Unity ORM format: {}",
                source.display(),
                path.display()
            );
            written.push(path);
        }

        if self.config.extract_from_orm {
            let maps = unpack_orm_texture(&packed, convention);
            let mut lines = vec![format!("Extracted textures from {}:", source.display())];

            for (role, map) in maps.maps() {
                let path = dir.join(format!("{}{}.{}", stem, role.suffix(), ext));
                save_rgba(map, &path)?;
                debug!("Saved {} map {}", role, path.display());

                let note = if role == ChannelRole::Metallic {
                    " (with smoothness in alpha channel)"
                } else {
                    ""
                };
                lines.push(format!("  {}: {}{}", role, path.display(), note));
                written.push(path);
            }

            info!("{}", lines.join("\n"));
        }

        Ok(written)
    }
}

/// Located AO, Roughness and Metallic files of one directory.
struct IndividualSources<'a> {
    dir: &'a Path,
    ao: &'a Path,
    roughness: &'a Path,
    metallic: &'a Path,
}

impl IndividualSources<'_> {
    /// Packed output path derived from the Metallic file name.
    fn packed_output(&self, token: &str, ext: &str) -> PathBuf {
        let stem = replace_metallic_token(&file_stem(self.metallic), token);
        self.dir.join(format!("{}.{}", stem, ext))
    }
}

/// Swaps the "Metallic" token of a stem for the packed-output token.
/// Falls back to a case-insensitive match, then to appending, so a packed
/// output never reuses the Metallic file name.
pub fn replace_metallic_token(stem: &str, token: &str) -> String {
    if stem.contains(METALLIC_STEM_TOKEN) {
        return stem.replace(METALLIC_STEM_TOKEN, token);
    }

    let needle = METALLIC_STEM_TOKEN.to_ascii_lowercase();
    match stem.to_ascii_lowercase().find(&needle) {
        Some(start) => format!(
            "{}{}{}",
            &stem[..start],
            token,
            &stem[start + needle.len()..]
        ),
        None => format!("{}_{}", stem, token),
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grouper::group_by_directory;
    use crate::texture_io::TextureFormat;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use tempfile::{TempDir, tempdir};

    fn config(dir: &Path) -> RunConfiguration {
        let mut config = RunConfiguration::with_defaults(dir.to_path_buf(), TextureFormat::Png);
        config.process_orm = false;
        config
    }

    fn gray(value: u8) -> RgbaImage {
        RgbaImage::from_pixel(2, 2, Rgba([value, value, value, 255]))
    }

    fn write_set(dir: &Path, names: &[(&str, RgbaImage)]) {
        for (name, image) in names {
            image.save(dir.join(name)).unwrap();
        }
    }

    fn file_set(dir: &TempDir) -> DirectoryFileSet {
        let mut paths: Vec<PathBuf> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .collect();
        paths.sort();
        group_by_directory(paths).unwrap().remove(0)
    }

    fn standard_set(dir: &Path) {
        write_set(
            dir,
            &[
                ("Brick_AO.png", gray(90)),
                ("Brick_Roughness.png", gray(80)),
                ("Brick_Metallic.png", gray(30)),
            ],
        );
    }

    fn count_files(dir: &Path) -> usize {
        fs::read_dir(dir).unwrap().count()
    }

    #[test]
    fn metallic_token_replacement() {
        assert_eq!(replace_metallic_token("Brick_Metallic", "ormue"), "Brick_ormue");
        assert_eq!(replace_metallic_token("brick_METALLIC_2k", "ormunity"), "brick_ormunity_2k");
        assert_eq!(replace_metallic_token("brick", "ormue"), "brick_ormue");
    }

    #[test]
    fn individual_maps_packed_both_ways() {
        let dir = tempdir().unwrap();
        standard_set(dir.path());
        let config = config(dir.path());

        let report = DirectoryProcessor::new(&config).process(&file_set(&dir));

        let unreal = load_rgb(&dir.path().join("Brick_ormue.png")).unwrap();
        let unity = load_rgb(&dir.path().join("Brick_ormunity.png")).unwrap();
        let metallic = load_rgba(&dir.path().join("Brick_Metallic.png")).unwrap();

        assert_eq!(unreal.get_pixel(1, 1), &Rgb([90, 80, 30]));
        assert_eq!(unity.get_pixel(1, 1), &Rgb([90, 175, 30]));
        assert_eq!(metallic.get_pixel(0, 0), &Rgba([30, 30, 30, 175]));
        assert!(matches!(
            report.individual,
            Some(IndividualOutcome::Succeeded { ref written, ref deleted })
                if written.len() == 3 && deleted.is_empty()
        ));
        assert!(report.orm.is_none());
        assert_eq!(report.failure_count(), 0);
    }

    #[test]
    fn disabled_outputs_are_not_written() {
        let dir = tempdir().unwrap();
        standard_set(dir.path());
        let mut config = config(dir.path());
        config.save_unity_orm = false;
        config.save_unity_smoothness_in_metallic = false;

        DirectoryProcessor::new(&config).process(&file_set(&dir));

        assert!(dir.path().join("Brick_ormue.png").exists());
        assert!(!dir.path().join("Brick_ormunity.png").exists());
        let metallic = load_rgba(&dir.path().join("Brick_Metallic.png")).unwrap();
        assert_eq!(metallic.get_pixel(0, 0), &Rgba([30, 30, 30, 255]));
    }

    #[test]
    fn two_of_three_maps_is_skipped() {
        let dir = tempdir().unwrap();
        write_set(
            dir.path(),
            &[("Brick_AO.png", gray(90)), ("Brick_Roughness.png", gray(80))],
        );
        let config = config(dir.path());

        let report = DirectoryProcessor::new(&config).process(&file_set(&dir));

        match &report.individual {
            Some(IndividualOutcome::Skipped { missing }) => {
                assert_eq!(missing, &vec![ChannelRole::Metallic]);
            }
            other => panic!("expected skip, got {:?}", other),
        }
        assert_eq!(count_files(dir.path()), 2);
        assert!(report.written().is_empty());
    }

    #[test]
    fn sources_deleted_after_successful_writes() {
        let dir = tempdir().unwrap();
        standard_set(dir.path());
        let mut config = config(dir.path());
        config.delete_non_orm_files = true;

        let report = DirectoryProcessor::new(&config).process(&file_set(&dir));

        assert!(!dir.path().join("Brick_AO.png").exists());
        assert!(!dir.path().join("Brick_Roughness.png").exists());
        assert!(!dir.path().join("Brick_Metallic.png").exists());
        assert!(dir.path().join("Brick_ormue.png").exists());
        assert!(dir.path().join("Brick_ormunity.png").exists());
        assert!(matches!(
            report.individual,
            Some(IndividualOutcome::Succeeded { ref deleted, .. }) if deleted.len() == 3
        ));
    }

    #[test]
    fn failed_write_keeps_sources() {
        let dir = tempdir().unwrap();
        standard_set(dir.path());
        // A directory in place of the Unity output makes that write fail.
        fs::create_dir(dir.path().join("Brick_ormunity.png")).unwrap();
        let files = group_by_directory(vec![
            dir.path().join("Brick_AO.png"),
            dir.path().join("Brick_Roughness.png"),
            dir.path().join("Brick_Metallic.png"),
        ])
        .unwrap()
        .remove(0);
        let mut config = config(dir.path());
        config.delete_non_orm_files = true;

        let report = DirectoryProcessor::new(&config).process(&files);

        assert!(matches!(
            report.individual,
            Some(IndividualOutcome::Failed { .. })
        ));
        assert_eq!(report.failure_count(), 1);
        assert!(dir.path().join("Brick_AO.png").exists());
        assert!(dir.path().join("Brick_Roughness.png").exists());
        assert!(dir.path().join("Brick_Metallic.png").exists());
    }

    #[test]
    fn mismatched_dimensions_fail_without_outputs() {
        let dir = tempdir().unwrap();
        write_set(
            dir.path(),
            &[
                ("Brick_AO.png", gray(90)),
                ("Brick_Roughness.png", RgbaImage::from_pixel(4, 4, Rgba([1, 1, 1, 255]))),
                ("Brick_Metallic.png", gray(30)),
            ],
        );
        let config = config(dir.path());

        let report = DirectoryProcessor::new(&config).process(&file_set(&dir));

        match report.individual {
            Some(IndividualOutcome::Failed { error }) => assert!(error.contains("Roughness")),
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(count_files(dir.path()), 3);
    }

    #[test]
    fn unreal_orm_converted_and_extracted() {
        let dir = tempdir().unwrap();
        RgbImage::from_pixel(2, 2, Rgb([200, 50, 10]))
            .save(dir.path().join("Brick_ORM.png"))
            .unwrap();
        let mut config = config(dir.path());
        config.process_individual = false;
        config.process_orm = true;
        config.extract_from_orm = true;

        let report = DirectoryProcessor::new(&config).process(&file_set(&dir));

        let unity = load_rgb(&dir.path().join("Brick_ORM_unity.png")).unwrap();
        assert_eq!(unity.get_pixel(0, 0), &Rgb([200, 205, 10]));

        let ao = load_rgba(&dir.path().join("Brick_ORM_AO.png")).unwrap();
        let roughness = load_rgba(&dir.path().join("Brick_ORM_Roughness.png")).unwrap();
        let smoothness = load_rgba(&dir.path().join("Brick_ORM_Smoothness.png")).unwrap();
        let metallic = load_rgba(&dir.path().join("Brick_ORM_Metallic.png")).unwrap();
        assert_eq!(ao.get_pixel(1, 0), &Rgba([200, 200, 200, 255]));
        assert_eq!(roughness.get_pixel(1, 0), &Rgba([50, 50, 50, 255]));
        assert_eq!(smoothness.get_pixel(1, 0), &Rgba([205, 205, 205, 255]));
        assert_eq!(metallic.get_pixel(1, 0), &Rgba([10, 10, 10, 205]));

        assert!(report.individual.is_none());
        assert_eq!(report.written().len(), 5);
    }

    #[test]
    fn unity_orm_is_only_extracted() {
        let dir = tempdir().unwrap();
        RgbImage::from_pixel(1, 1, Rgb([1, 200, 3]))
            .save(dir.path().join("Brick_ORM.png"))
            .unwrap();
        let mut config = config(dir.path());
        config.process_individual = false;
        config.process_orm = true;
        config.is_unreal_orm_format = false;
        config.extract_from_orm = true;

        DirectoryProcessor::new(&config).process(&file_set(&dir));

        assert!(!dir.path().join("Brick_ORM_unity.png").exists());
        let roughness = load_rgba(&dir.path().join("Brick_ORM_Roughness.png")).unwrap();
        let metallic = load_rgba(&dir.path().join("Brick_ORM_Metallic.png")).unwrap();
        assert_eq!(roughness.get_pixel(0, 0), &Rgba([55, 55, 55, 255]));
        assert_eq!(metallic.get_pixel(0, 0), &Rgba([3, 3, 3, 200]));
    }

    #[test]
    fn ormunity_files_are_left_alone() {
        let dir = tempdir().unwrap();
        RgbImage::from_pixel(1, 1, Rgb([1, 2, 3]))
            .save(dir.path().join("Brick_ormunity.png"))
            .unwrap();
        let mut config = config(dir.path());
        config.process_individual = false;
        config.process_orm = true;
        config.extract_from_orm = true;

        let report = DirectoryProcessor::new(&config).process(&file_set(&dir));

        assert!(matches!(report.orm, Some(OrmFlowOutcome::Skipped)));
        assert_eq!(count_files(dir.path()), 1);
    }

    #[test]
    fn broken_orm_file_does_not_stop_siblings() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("A_ORM.png"), b"not a png").unwrap();
        RgbImage::from_pixel(1, 1, Rgb([9, 9, 9]))
            .save(dir.path().join("B_ORM.png"))
            .unwrap();
        let mut config = config(dir.path());
        config.process_individual = false;
        config.process_orm = true;

        let report = DirectoryProcessor::new(&config).process(&file_set(&dir));

        let Some(OrmFlowOutcome::Processed { files }) = &report.orm else {
            panic!("expected processed ORM files");
        };
        assert_eq!(files.len(), 2);
        assert!(matches!(files[0], OrmFileOutcome::Failed { .. }));
        assert!(matches!(files[1], OrmFileOutcome::Succeeded { .. }));
        assert!(dir.path().join("B_ORM_unity.png").exists());
        assert_eq!(report.failure_count(), 1);
    }
}
