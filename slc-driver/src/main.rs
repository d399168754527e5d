//! Slate Compiler Driver
//!
//! Command-line entry point: reads a parsed program in the JSON hand-off
//! format, runs declaration resolution, type checking, IR generation and
//! assembly emission, and writes a `.s` file. With `--link` the driver
//! also runs the system assembler and linker for a 32-bit executable.

use clap::Parser;
use log::info;
use slc_ast::Program;
use slc_common::ErrorReporter;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Parser)]
#[command(name = "slc")]
#[command(about = "Slate Compiler")]
#[command(version = "0.1.0")]
struct Cli {
    /// Parsed program in the JSON hand-off format
    input: PathBuf,

    /// Output assembly file (defaults to the input with a .s extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the IR statement list to stdout before emission
    #[arg(long)]
    print_ir: bool,

    /// Assemble and link the output into a 32-bit executable
    #[arg(long)]
    link: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = compile(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn compile(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let source = fs::read_to_string(&cli.input)?;
    let mut program: Program = serde_json::from_str(&source)?;
    info!(
        "loaded {} classes from {}",
        program.classes.len(),
        cli.input.display()
    );

    let symbols = match slc_sema::analyze(&mut program) {
        Ok(symbols) => symbols,
        Err(errors) => {
            let mut reporter = ErrorReporter::new();
            reporter.extend(errors);
            reporter.print_all();
            eprintln!("{}", reporter.summary());
            std::process::exit(1);
        }
    };

    let (ir, _symbols) = slc_ir::generate(&program, symbols);
    if cli.print_ir {
        print!("{}", ir.to_text());
    }

    let asm = slc_backend::emit_program(&ir);
    let asm_path = match &cli.output {
        Some(path) => path.clone(),
        None => cli.input.with_extension("s"),
    };
    fs::write(&asm_path, &asm)?;
    println!("Assembly written to: {}", asm_path.display());

    if cli.link {
        link(&asm_path)?;
    }
    Ok(())
}

/// Assemble and link with the system toolchain in 32-bit mode. The entry
/// point is `main` directly; there is no runtime to start from.
fn link(asm_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let object_path = asm_path.with_extension("o");
    let exe_path = asm_path.with_extension("");

    run_tool(
        Command::new("as")
            .arg("--32")
            .arg("-o")
            .arg(&object_path)
            .arg(asm_path),
        "as",
    )?;
    run_tool(
        Command::new("ld")
            .args(["-m", "elf_i386", "-e", "main"])
            .arg("-o")
            .arg(&exe_path)
            .arg(&object_path),
        "ld",
    )?;

    println!("Executable written to: {}", exe_path.display());
    Ok(())
}

/// Run a child tool to completion, surfacing its captured stdout on both
/// the success and the failure path
fn run_tool(command: &mut Command, name: &str) -> Result<String, Box<dyn std::error::Error>> {
    let output = command.output()?;
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if !stdout.is_empty() {
        print!("{}", stdout);
    }
    if !output.status.success() {
        return Err(format!(
            "{} failed:\n{}",
            name,
            String::from_utf8_lossy(&output.stderr)
        )
        .into());
    }
    Ok(stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_tool_captures_stdout() {
        let stdout = run_tool(Command::new("sh").args(["-c", "echo listing"]), "sh").unwrap();
        assert_eq!(stdout.trim(), "listing");
    }

    #[test]
    fn test_run_tool_failure_carries_stderr() {
        let err = run_tool(
            Command::new("sh").args(["-c", "echo boom >&2; exit 1"]),
            "sh",
        )
        .unwrap_err();
        assert!(err.to_string().contains("sh failed"));
        assert!(err.to_string().contains("boom"));
    }
}
