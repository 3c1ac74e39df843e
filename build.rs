// build.rs

use clap::{Arg, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common argument: database path
fn db_path_arg() -> Arg {
    Arg::new("db_path")
        .short('d')
        .long("db-path")
        .value_name("PATH")
        .default_value("potluck.db")
        .help("Path to the database file")
}

fn build_cli() -> Command {
    Command::new("potluck")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Potluck Contributors")
        .about("Social recipe sharing server")
        .subcommand_required(false)
        .subcommand(
            Command::new("init")
                .about("Create the database and apply migrations")
                .arg(db_path_arg()),
        )
        .subcommand(
            Command::new("serve")
                .about("Run the HTTP server")
                .arg(
                    Arg::new("db_path")
                        .short('d')
                        .long("db-path")
                        .value_name("PATH")
                        .help("Path to the database file (overrides the config file)"),
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .value_name("FILE")
                        .help("TOML configuration file"),
                )
                .arg(
                    Arg::new("bind")
                        .short('b')
                        .long("bind")
                        .value_name("ADDR")
                        .help("Address to listen on (default: 127.0.0.1:8000)"),
                ),
        )
        .subcommand(
            Command::new("seed")
                .about("Fill the database with demonstration data")
                .arg(db_path_arg())
                .arg(
                    Arg::new("users")
                        .long("users")
                        .default_value("200")
                        .help("Total number of users, including the three fixture users"),
                )
                .arg(
                    Arg::new("recipes")
                        .long("recipes")
                        .default_value("300")
                        .help("Total number of recipes"),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .help("Random seed for a reproducible data set"),
                )
                .arg(
                    Arg::new("quiet")
                        .short('q')
                        .long("quiet")
                        .action(clap::ArgAction::SetTrue)
                        .help("Do not show progress bars"),
                ),
        )
        .subcommand(
            Command::new("unseed")
                .about("Remove all content and every non-staff user")
                .arg(db_path_arg()),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("potluck.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
