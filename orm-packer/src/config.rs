/// Run configuration resolved from arguments with interactive fallback.
use crate::cli::Cli;
use crate::error::PackerError;
use crate::texture_io::TextureFormat;
use constants::texture::SUPPORTED_EXTENSIONS;
use serde::Serialize;
use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Source of answers for questions the arguments did not cover.
pub trait Prompter {
    /// Shows the question and returns the answer, or `None` once input is closed.
    fn ask(&mut self, question: &str) -> Option<String>;
}

/// Reads answers line by line from standard input.
pub struct StdinPrompter;

impl Prompter for StdinPrompter {
    fn ask(&mut self, question: &str) -> Option<String> {
        println!("{}", question);
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }
}

/// Everything a batch run needs. Fixed for the duration of the run.
#[derive(Debug, Clone, Serialize)]
pub struct RunConfiguration {
    pub search_path: PathBuf,
    pub format: TextureFormat,
    pub process_individual: bool,
    pub process_orm: bool,
    /// Existing ORM textures are (AO, Roughness, Metallic) when set,
    /// (AO, Smoothness, Metallic) otherwise.
    pub is_unreal_orm_format: bool,
    pub extract_from_orm: bool,
    pub save_unity_orm: bool,
    pub save_unreal_orm: bool,
    pub save_unity_smoothness_in_metallic: bool,
    pub delete_non_orm_files: bool,
}

impl RunConfiguration {
    /// Defaults used for questions that are never asked.
    pub fn with_defaults(search_path: PathBuf, format: TextureFormat) -> Self {
        Self {
            search_path,
            format,
            process_individual: true,
            process_orm: true,
            is_unreal_orm_format: true,
            extract_from_orm: false,
            save_unity_orm: true,
            save_unreal_orm: true,
            save_unity_smoothness_in_metallic: true,
            delete_non_orm_files: false,
        }
    }
}

/// Resolves the full configuration, asking only for what the arguments lack.
/// Questions for a disabled flow are skipped and keep their defaults.
pub fn resolve<P: Prompter>(cli: &Cli, prompter: &mut P) -> Result<RunConfiguration, PackerError> {
    let requested = match &cli.path {
        Some(path) if !path.as_os_str().is_empty() => path.clone(),
        _ => prompter
            .ask("Enter a path to search")
            .filter(|answer| !answer.is_empty())
            .map(PathBuf::from)
            .ok_or(PackerError::NoSearchPath)?,
    };
    let search_path = resolve_search_path(&requested, &search_roots(), prompter)?;

    let extension = match &cli.extension {
        Some(ext) => Some(ext.clone()),
        None => prompter.ask(&format!(
            "Enter the file extension to search for (ex. {})",
            SUPPORTED_EXTENSIONS.join(", ")
        )),
    };
    let format = extension
        .as_deref()
        .and_then(TextureFormat::parse)
        .unwrap_or_else(|| {
            let format = TextureFormat::default();
            warn!("Moving forward with {}", format.extension());
            format
        });

    let mut config = RunConfiguration::with_defaults(search_path, format);

    config.process_individual = flag_or_ask(
        &cli.process_individual,
        "Should process individual textures (AO, Roughness, Metallic)? Y/N",
        prompter,
    );
    config.process_orm = flag_or_ask(
        &cli.process_orm,
        "Should process existing ORM textures? Y/N",
        prompter,
    );

    if config.process_orm {
        config.is_unreal_orm_format = flag_or_ask(
            &cli.is_unreal_orm_format,
            "Are existing ORM textures in Unreal format (R=AO, G=Roughness, B=Metallic)? Y/N\n\
             Answer No if ORM is in Unity format (R=AO, G=Smoothness, B=Metallic)",
            prompter,
        );
        config.extract_from_orm = flag_or_ask(
            &cli.extract_from_orm,
            "Extract individual AO, Roughness/Smoothness, and Metallic textures from ORM? Y/N",
            prompter,
        );
    }

    if config.process_individual {
        config.save_unity_orm = flag_or_ask(
            &cli.save_unity_orm,
            "Should save Unity ORM from individual textures? Y/N",
            prompter,
        );
        config.save_unreal_orm = flag_or_ask(
            &cli.save_unreal_orm,
            "Should save Unreal ORM from individual textures? Y/N",
            prompter,
        );
        config.save_unity_smoothness_in_metallic = flag_or_ask(
            &cli.save_unity_smoothness_in_metallic,
            "Should save Unity Smoothness from inverse of roughness to alpha of metallic texture? Y/N",
            prompter,
        );
        config.delete_non_orm_files = flag_or_ask(
            &cli.delete_non_orm_files,
            "Should DELETE roughness, metallic and AO textures after the operations are done? Y/N",
            prompter,
        );
    }

    Ok(config)
}

/// Parses a boolean argument, accepting `true`/`false` in any case.
pub fn parse_flag(value: &str) -> Option<bool> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Interprets a yes/no answer. Anything unrecognised counts as no.
pub fn parse_yes_no(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes")
}

fn flag_or_ask<P: Prompter>(arg: &Option<String>, question: &str, prompter: &mut P) -> bool {
    match arg.as_deref().and_then(parse_flag) {
        Some(value) => value,
        None => prompter
            .ask(question)
            .map(|answer| parse_yes_no(&answer))
            .unwrap_or(false),
    }
}

/// Base directories tried, in order, for a relative search path.
fn search_roots() -> Vec<PathBuf> {
    let mut roots = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        // Running from target/<profile>/ inside the workspace.
        roots.push(exe_dir.join("..").join(".."));
        roots.push(exe_dir.join("..").join("..").join(".."));
    }
    roots
}

/// Finds an existing directory for the requested path, or offers to create it.
pub fn resolve_search_path<P: Prompter>(
    requested: &Path,
    roots: &[PathBuf],
    prompter: &mut P,
) -> Result<PathBuf, PackerError> {
    if requested.is_dir() {
        return Ok(requested.to_path_buf());
    }

    if let Some(found) = roots
        .iter()
        .map(|root| root.join(requested))
        .find(|candidate| candidate.is_dir())
    {
        info!("Found directory at: {}", found.display());
        return Ok(found);
    }

    let question = format!(
        "The directory '{}' does not exist. Would you like to create it? Y/N",
        requested.display()
    );
    let create = prompter
        .ask(&question)
        .is_some_and(|answer| answer.trim().eq_ignore_ascii_case("y"));

    if !create {
        return Err(PackerError::SearchPathDeclined(requested.to_path_buf()));
    }

    fs::create_dir_all(requested)?;
    info!("Directory '{}' created successfully.", requested.display());
    Ok(requested.to_path_buf())
}
