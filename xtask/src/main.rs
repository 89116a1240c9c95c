//! Build automation tasks for the hc595-matrix project.
//!
//! Run with: `cargo xtask <command>`

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::process::{Command, ExitCode};

const FIRMWARE_TARGET: &str = "thumbv6m-none-eabi";
const FIRMWARE_FEATURES: &str = "pico1,arm";
const DEMOS: [&str; 1] = ["clock"];

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for hc595-matrix", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: build lib and demos, run doc and host tests, generate docs
    CheckAll,
    /// Build the library for the Pico
    Build,
    /// Build a demo firmware
    Demo {
        /// Demo name (e.g., clock)
        name: String,
    },
    /// Build UF2 firmware file for flashing to Pico
    Uf2 {
        /// Demo name (e.g., clock)
        name: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::CheckAll => check_all(),
        Commands::Build => build_lib(),
        Commands::Demo { name } => {
            if build_demo(&name, false) {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Commands::Uf2 { name } => build_uf2(&name),
    }
}

fn firmware_command(subcommand: &str) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.current_dir(workspace_root()).args([
        subcommand,
        "--target",
        FIRMWARE_TARGET,
        "--features",
        FIRMWARE_FEATURES,
        "--no-default-features",
    ]);
    cmd
}

fn check_all() -> ExitCode {
    println!("{}", "==> Building library...".cyan());
    if !run_command(firmware_command("build").arg("--lib")) {
        return ExitCode::FAILURE;
    }

    println!("\n{}", "==> Building demos...".cyan());
    for demo in &DEMOS {
        println!("  {}", format!("- {demo}").bright_black());
        if !run_command(firmware_command("build").args(["--bin", demo])) {
            return ExitCode::FAILURE;
        }
    }

    println!("\n{}", "==> Running doc tests...".cyan());
    if !run_command(firmware_command("test").arg("--doc")) {
        return ExitCode::FAILURE;
    }

    println!("\n{}", "==> Running host tests...".cyan());
    let host_target = host_target();
    match host_target.as_deref() {
        Some(target) => {
            println!(
                "  {}",
                format!("Using host target: {target}").bright_black()
            );
        }
        None => {
            println!(
                "{}",
                "  Unable to detect host target; relying on cargo default.".bright_black()
            );
        }
    }

    let mut host_test_cmd = Command::new("cargo");
    host_test_cmd
        .current_dir(workspace_root())
        .args(["test", "--lib", "--tests"]);

    if let Some(target) = host_target {
        host_test_cmd.arg("--target").arg(target);
    }

    host_test_cmd.args(["--no-default-features", "--features", "host"]);

    if !run_command(&mut host_test_cmd) {
        return ExitCode::FAILURE;
    }

    println!("\n{}", "==> Building documentation...".cyan());
    if !run_command(firmware_command("doc").arg("--no-deps")) {
        return ExitCode::FAILURE;
    }

    println!("\n{}", "==> All checks passed!".green().bold());
    ExitCode::SUCCESS
}

fn build_lib() -> ExitCode {
    println!(
        "{}",
        format!("Building library with features: {FIRMWARE_FEATURES}").cyan()
    );

    if run_command(firmware_command("build").arg("--lib")) {
        println!("{}", "Build successful!".green());
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn build_demo(name: &str, release: bool) -> bool {
    println!(
        "{}",
        format!("Building demo '{name}' with features: {FIRMWARE_FEATURES}").cyan()
    );

    let mut cmd = firmware_command("build");
    cmd.args(["--bin", name]);
    if release {
        cmd.arg("--release");
    }
    let built = run_command(&mut cmd);
    if built {
        println!("{}", "Build successful!".green());
    }
    built
}

fn build_uf2(name: &str) -> ExitCode {
    println!("{}", format!("Building UF2 for demo '{name}'").cyan());
    println!("  Features: {}", FIRMWARE_FEATURES.bright_black());
    println!("  Target: {}", FIRMWARE_TARGET.bright_black());

    // Build in release mode for UF2
    if !build_demo(name, true) {
        return ExitCode::FAILURE;
    }

    // Convert to UF2 using elf2uf2-rs
    let elf_path = format!("target/{FIRMWARE_TARGET}/release/{name}");
    let uf2_path = format!("{name}.uf2");

    println!("\n{}", "Converting to UF2 format...".cyan());
    if run_command(
        Command::new("elf2uf2-rs")
            .current_dir(workspace_root())
            .args([&elf_path, &uf2_path]),
    ) {
        println!("{}", format!("UF2 created: {uf2_path}").green().bold());
        println!("{}", "Ready to drag-and-drop to your Pico!".bright_black());
        ExitCode::SUCCESS
    } else {
        println!(
            "{}",
            "Note: Install elf2uf2-rs with: cargo install elf2uf2-rs".yellow()
        );
        ExitCode::FAILURE
    }
}

fn workspace_root() -> std::path::PathBuf {
    // `cargo xtask` runs from the workspace root.
    std::env::current_dir().expect("Failed to get current directory")
}

fn host_target() -> Option<String> {
    let output = Command::new("rustc").arg("-vV").output().ok()?;
    if !output.status.success() {
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    for line in stdout.lines() {
        if let Some(host) = line.strip_prefix("host: ") {
            return Some(host.trim().to_string());
        }
    }
    None
}

fn run_command(cmd: &mut Command) -> bool {
    match cmd.status() {
        Ok(status) => status.success(),
        Err(e) => {
            eprintln!("{}", format!("Failed to execute command: {e}").red());
            false
        }
    }
}
