//! CLI module - Command-line interface for CourseOwl
//!
//! This module provides a structured CLI using clap for argument parsing.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CourseOwl - course catalog and learner preferences
#[derive(Parser)]
#[command(name = "courseowl")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of the default locations
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server (default)
    #[command(alias = "web")]
    Serve {
        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Create default config file
    Init,

    /// Create an account
    Register {
        email: String,
        password: String,
    },

    /// Deactivate the account that owns an email address
    Deactivate {
        email: String,
    },

    /// List all subjects
    Subjects,

    /// List all courses
    #[command(alias = "ls")]
    Courses,
}

pub use commands::*;
