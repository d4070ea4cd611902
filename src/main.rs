// SPDX-License-Identifier: MIT
//
// spvdec
//
// A small tool to parse SPIR-V shader modules and reconstruct a
// pseudo-C listing plus a reflection summary.
//
// The interesting parts live in the library:
//  - Two-pass module parser over the packed word stream
//  - Expression inliner that folds temporaries into their single use
//  - Structural control-flow rebuild from merge-block annotations
//  - Interface reflection (signatures, constant blocks, resources)

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use spvdec::{disassemble_module, parse_module, reflect_module, words_from_bytes};

#[derive(Parser)]
#[command(name = "spvdec", version, about = "SPIR-V shader module decompiler")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decompile a SPIR-V module into a pseudo-C listing.
    Disasm {
        file: PathBuf,
    },

    /// Print the reflected interface: signatures, constant blocks and
    /// bound resources.
    Reflect {
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Disasm { file } => {
            let data = std::fs::read(&file).with_context(|| format!("read {:?}", file))?;
            let words = words_from_bytes(&data)?;
            let mut module = parse_module(&words).context("parse SPIR-V module")?;
            print!("{}", disassemble_module(&mut module));
        }

        Command::Reflect { file } => {
            let data = std::fs::read(&file).with_context(|| format!("read {:?}", file))?;
            let words = words_from_bytes(&data)?;
            let module = parse_module(&words).context("parse SPIR-V module")?;
            let reflection = reflect_module(&module);
            println!("{:#?}", reflection);
        }
    }
    Ok(())
}
