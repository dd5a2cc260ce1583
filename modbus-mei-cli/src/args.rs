use std::{num::ParseIntError, path::PathBuf};

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about = "Encode, decode and serve Modbus read device identification frames", long_about = None)]
pub struct Cli {
    /// Log codec decisions to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Encode a request body
    Request(RequestArgs),

    /// Decode a request body
    DecodeRequest(HexArgs),

    /// Decode a response body and list its objects
    Decode(DecodeArgs),

    /// Estimate the RTU frame length from its first bytes
    Estimate(HexArgs),

    /// Answer a request from the identity given on the command line
    Identify(IdentifyArgs),

    /// Read RTU response frames from stdin and list their objects
    Stream,
}

#[derive(Args, Debug)]
pub struct RequestArgs {
    /// Read device id code (1 basic, 2 regular, 3 extended, 4 individual)
    #[arg(value_parser = parse_number)]
    pub read_code: u16,

    /// Object id to start reading from
    #[arg(default_value = "0", value_parser = parse_number)]
    pub object_id: u16,
}

#[derive(Args, Debug)]
pub struct HexArgs {
    /// Bytes as hex, whitespace is ignored
    #[arg(num_args = 1.., required = true)]
    pub hex: Vec<String>,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    #[command(flatten)]
    pub input: HexArgs,

    /// Write the object list to a csv file
    #[arg(long)]
    pub export: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct IdentifyArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    #[arg(long, default_value = env!("CARGO_PKG_NAME"))]
    pub vendor_name: String,

    #[arg(long, default_value = env!("CARGO_PKG_NAME"))]
    pub product_code: String,

    #[arg(long, default_value = env!("CARGO_PKG_VERSION"))]
    pub revision: String,

    #[arg(long)]
    pub vendor_url: Option<String>,

    #[arg(long)]
    pub product_name: Option<String>,

    #[arg(long)]
    pub model_name: Option<String>,

    #[arg(long)]
    pub user_application_name: Option<String>,

    /// Private object as ID=VALUE, e.g. 0x80=serial-42
    #[arg(long = "object", value_parser = parse_object)]
    pub objects: Vec<(u8, String)>,

    /// Write the object list to a csv file
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Decimal or 0x prefixed hexadecimal.
fn parse_number(input: &str) -> Result<u16, ParseIntError> {
    match input.strip_prefix("0x").or_else(|| input.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => input.parse(),
    }
}

fn parse_object(input: &str) -> Result<(u8, String), String> {
    let (id, value) = input.split_once('=').ok_or("expected ID=VALUE")?;
    let id = parse_number(id).map_err(|e| e.to_string())?;
    let id = u8::try_from(id).map_err(|_| format!("object id {id} does not fit a byte"))?;
    Ok((id, value.to_string()))
}
