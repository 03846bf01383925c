/// Command line arguments. Anything left out is asked for interactively.
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Default)]
#[command(name = "orm-packer")]
#[command(
    version,
    about = "Packs AO, Roughness and Metallic maps into ORM textures and converts between Unreal and Unity conventions",
    long_about = None
)]
pub struct Cli {
    /// Directory to search recursively
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Extension to search for (png, jpg, exr)
    #[arg(value_name = "EXT")]
    pub extension: Option<String>,

    /// Combine individual AO, Roughness and Metallic maps (true/false)
    #[arg(value_name = "PROCESS_INDIVIDUAL")]
    pub process_individual: Option<String>,

    /// Process existing ORM textures (true/false)
    #[arg(value_name = "PROCESS_ORM")]
    pub process_orm: Option<String>,

    /// Existing ORM textures use the Unreal convention (true/false)
    #[arg(value_name = "IS_UNREAL_ORM")]
    pub is_unreal_orm_format: Option<String>,

    /// Extract individual maps from ORM textures (true/false)
    #[arg(value_name = "EXTRACT_FROM_ORM")]
    pub extract_from_orm: Option<String>,

    /// Save a Unity ORM from individual maps (true/false)
    #[arg(value_name = "SAVE_UNITY_ORM")]
    pub save_unity_orm: Option<String>,

    /// Save an Unreal ORM from individual maps (true/false)
    #[arg(value_name = "SAVE_UNREAL_ORM")]
    pub save_unreal_orm: Option<String>,

    /// Write smoothness into the alpha of the Metallic map (true/false)
    #[arg(value_name = "SMOOTHNESS_IN_METALLIC")]
    pub save_unity_smoothness_in_metallic: Option<String>,

    /// Delete the individual maps after packing (true/false)
    #[arg(value_name = "DELETE_SOURCES")]
    pub delete_non_orm_files: Option<String>,

    /// Number of parallel threads
    #[arg(short = 'j', long, value_name = "N")]
    pub threads: Option<usize>,

    /// Write a JSON summary of the batch to this file
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,
}
