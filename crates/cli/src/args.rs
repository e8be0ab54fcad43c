use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use stlcodec::{FileFormat, DEFAULT_HEADER};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Ascii,
    Binary,
}

impl From<Format> for FileFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Ascii => FileFormat::Ascii,
            Format::Binary => FileFormat::Binary,
        }
    }
}

#[derive(clap::Args, Debug)]
pub struct InfoArgs {
    pub stl_path: PathBuf,

    /// Read the input as this format instead of detecting it.
    #[arg(short, long, value_enum)]
    pub format: Option<Format>,
}

#[derive(clap::Args, Debug)]
pub struct ConvertArgs {
    pub input: PathBuf,

    /// Output path for the converted STL file.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Format to write.
    #[arg(short, long, value_enum, default_value_t = Format::Binary)]
    pub format: Format,

    /// Read the input as this format instead of detecting it.
    #[arg(long, value_enum)]
    pub input_format: Option<Format>,

    /// Text for the 80-byte header of binary output.
    #[arg(long, default_value = DEFAULT_HEADER)]
    pub header: String,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the format, size and bounds of an STL file.
    Info(InfoArgs),
    /// Rewrite an STL file as ASCII or binary.
    Convert(ConvertArgs),
}
