#![forbid(unsafe_code)]

use anyhow::{Result, anyhow};
use log::{info, error, LevelFilter};
use log4rs::append::console::ConsoleAppender;
use log4rs::config::{Appender, Config as LogConfig, Root};
use log4rs::encode::pattern::PatternEncoder;
use serde::Deserialize;
use std::{env, fs, path::Path};
use lazy_static::lazy_static;
use structopt::StructOpt;

// Greeting Utilities
use crate::utils::{greeting_utils, errors::Errors};

// ***************************************************************************
//                                Constants
// ***************************************************************************
// Directory and file locations. Unless otherwise noted, all files and directories
// are relative to the root directory.
const ENV_GREETING_ROOT_DIR : &str = "GREETING_ROOT_DIR";
const ENV_PORT              : &str = "PORT";
const DEFAULT_ROOT_DIR      : &str = "~/.greeting";
const CONFIG_DIR            : &str = "/config";
const LOG4RS_CONFIG_FILE    : &str = "/log4rs.yml";    // relative to config dir
const GREETING_CONFIG_FILE  : &str = "/greeting.toml"; // relative to config dir

// Networking.
const DEFAULT_HTTP_ADDR     : &str = "0.0.0.0";
const DEFAULT_HTTP_PORT     : u16  = 5000;

// Used when no log4rs file is installed.
const DEFAULT_LOG_PATTERN   : &str = "{d(%Y-%m-%dT%H:%M:%S%.3f%z)} {h({l})} {t} - {m}{n}";

// ***************************************************************************
//                             Static Variables
// ***************************************************************************
// Assign the command line arguments BEFORE RUNTIME_CTX is initialized in main.
lazy_static! {
    pub static ref GREETING_ARGS: GreetingArgs = init_greeting_args();
}

// Calculate the data directories BEFORE RUNTIME_CTX is initialized in main.
lazy_static! {
    pub static ref GREETING_DIRS: GreetingDirs = init_greeting_dirs();
}

// ***************************************************************************
//                             Directory Structs
// ***************************************************************************
// ---------------------------------------------------------------------------
// GreetingDirs:
// ---------------------------------------------------------------------------
#[derive(Debug)]
#[allow(dead_code)]
pub struct GreetingDirs {
    pub root_dir: String,
    pub config_dir: String,
}

// ***************************************************************************
//                               Config Structs
// ***************************************************************************
// ---------------------------------------------------------------------------
// GreetingArgs:
// ---------------------------------------------------------------------------
#[derive(Debug, StructOpt)]
#[structopt(name = "greeting_args", about = "Command line arguments for the Greeting Server.")]
pub struct GreetingArgs {
    /// Specify the server's root data directory.
    ///
    /// The optional greeting.toml and log4rs.yml files are read from the
    /// config subdirectory.  The root directory is chosen using the
    /// following priority order:
    ///
    ///   1. If set, the value of the GREETING_ROOT_DIR environment,
    ///
    ///   2. Otherwise, if set, the value of the --root-dir command line argument,
    ///
    ///   3. Otherwise, ~/.greeting
    ///
    #[structopt(short, long)]
    pub root_dir: Option<String>,

    /// Listening port, used when the PORT environment variable is not set.
    #[structopt(short, long)]
    pub port: Option<u16>,
}

// ---------------------------------------------------------------------------
// Parms:
// ---------------------------------------------------------------------------
#[derive(Debug)]
#[allow(dead_code)]
pub struct Parms {
    pub config_file: String,
    pub config: Config,
}

// ---------------------------------------------------------------------------
// RuntimeCtx:
// ---------------------------------------------------------------------------
#[derive(Debug)]
#[allow(dead_code)]
pub struct RuntimeCtx {
    pub parms: Parms,
    pub greeting_args: &'static GreetingArgs,
    pub greeting_dirs: &'static GreetingDirs,
}

// ---------------------------------------------------------------------------
// Config:
// ---------------------------------------------------------------------------
#[derive(Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub title: String,
    pub http_addr: String,
    pub http_port: u16,
}

impl Config {
    pub fn new() -> Self {
        Config::default()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Greeting Server".to_string(),
            http_addr: DEFAULT_HTTP_ADDR.to_string(),
            http_port: DEFAULT_HTTP_PORT,
        }
    }
}

// ***************************************************************************
//                            Directory Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// init_greeting_args:
// ---------------------------------------------------------------------------
/** Get the command line arguments. */
fn init_greeting_args() -> GreetingArgs {
    let args = GreetingArgs::from_args();
    println!("{:?}", args);
    args
}

// ---------------------------------------------------------------------------
// init_greeting_dirs:
// ---------------------------------------------------------------------------
/** Calculate the external data directories.  Nothing is created; a missing
 * directory simply means all defaults are used.
 */
fn init_greeting_dirs() -> GreetingDirs {
    let root_dir = get_root_dir();
    let config_dir = root_dir.clone() + CONFIG_DIR;
    GreetingDirs { root_dir, config_dir }
}

// ---------------------------------------------------------------------------
// get_root_dir:
// ---------------------------------------------------------------------------
fn get_root_dir() -> String {
    // Order of precedence:
    //  1. Environment variable
    //  2. Command line --root-dir argument
    //  3. Default location
    //
    let root_dir = env::var(ENV_GREETING_ROOT_DIR).unwrap_or_else(
        |_| {
            match GREETING_ARGS.root_dir.clone() {
                Some(r) => r,
                None => DEFAULT_ROOT_DIR.to_string(),
            }
        });

    // Canonicalize the path.
    greeting_utils::get_absolute_path(&root_dir)
}

// ***************************************************************************
//                               Log Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// init_log:
// ---------------------------------------------------------------------------
/** Initialize log4rs from the installed configuration file if there is one,
 * otherwise log to the console at info level.
 */
pub fn init_log() {
    let logconfig = init_log_config();
    if Path::new(&logconfig).is_file() {
        if let Err(e) = log4rs::init_file(logconfig.clone(), Default::default()) {
            println!("{}", e);
            let s = format!("{}", Errors::Log4rsInitialization(logconfig));
            panic!("{}", s);
        }
        info!("Log4rs initialized using: {}", logconfig);
    } else {
        if let Err(e) = log4rs::init_config(default_log_config()) {
            panic!("{}: {}", Errors::Log4rsInitialization("<console default>".to_string()), e);
        }
        info!("Log4rs initialized with console defaults, no file at: {}", logconfig);
    }
}

// ---------------------------------------------------------------------------
// init_log_config:
// ---------------------------------------------------------------------------
fn init_log_config() -> String {
    GREETING_DIRS.config_dir.clone() + LOG4RS_CONFIG_FILE
}

// ---------------------------------------------------------------------------
// default_log_config:
// ---------------------------------------------------------------------------
fn default_log_config() -> LogConfig {
    let stdout = ConsoleAppender::builder()
        .encoder(Box::new(PatternEncoder::new(DEFAULT_LOG_PATTERN)))
        .build();

    // The builder only fails on duplicate or dangling appender names.
    LogConfig::builder()
        .appender(Appender::builder().build("stdout", Box::new(stdout)))
        .build(Root::builder().appender("stdout").build(LevelFilter::Info))
        .unwrap_or_else(|e| panic!("Invalid default log4rs configuration: {}", e))
}

// ***************************************************************************
//                             Parms Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// get_parms:
// ---------------------------------------------------------------------------
/** Retrieve the application parameters from the configuration file in the
 * config directory.  If there's no file the default values are used.  The
 * PORT environment variable and the --port argument override the file.
 */
fn get_parms() -> Result<Parms> {
    // Get the config file path from its data directory.
    let config_file = GREETING_DIRS.config_dir.clone() + GREETING_CONFIG_FILE;

    // Read the configuration file.
    let config_file_abs = greeting_utils::get_absolute_path(&config_file);
    info!("{}", Errors::ReadingConfigFile(config_file_abs.clone()));
    let mut parms = match fs::read_to_string(&config_file_abs) {
        Ok(contents) => Parms { config: parse_config(&contents, &config_file_abs)?,
                                config_file: config_file_abs },
        Err(_) => {
            info!("Unable to read configuration at {}. Using default values.", config_file);
            Parms { config_file: Default::default(), config: Config::new() }
        }
    };

    // Apply overrides.
    parms.config.http_port = resolve_port(env::var(ENV_PORT).ok().as_deref(),
                                          GREETING_ARGS.port,
                                          parms.config.http_port)?;
    Ok(parms)
}

// ---------------------------------------------------------------------------
// parse_config:
// ---------------------------------------------------------------------------
fn parse_config(contents: &str, config_file_abs: &str) -> Result<Config> {
    match toml::from_str(contents) {
        Ok(c)  => Ok(c),
        Err(e) => {
            let msg = format!("{}\n   {}", Errors::TOMLParseError(config_file_abs.to_string()), e);
            error!("{}", msg);
            Err(anyhow!(msg))
        }
    }
}

// ---------------------------------------------------------------------------
// resolve_port:
// ---------------------------------------------------------------------------
/** Pick the listening port: PORT environment value, then the command line,
 * then whatever the configuration file (or its default) says.  A PORT value
 * that isn't a valid port number is an error.
 */
fn resolve_port(env_port: Option<&str>, arg_port: Option<u16>, config_port: u16) -> Result<u16> {
    if let Some(p) = env_port {
        return p.trim().parse::<u16>()
            .map_err(|e| anyhow!("Invalid {} value '{}': {}", ENV_PORT, p, e));
    }
    Ok(arg_port.unwrap_or(config_port))
}

// ***************************************************************************
//                             Config Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// init_runtime_context:
// ---------------------------------------------------------------------------
pub fn init_runtime_context() -> RuntimeCtx {
    // If this fails the application aborts.
    let parms = get_parms().expect("FAILED to read configuration file.");
    RuntimeCtx {parms, greeting_args: &GREETING_ARGS, greeting_dirs: &GREETING_DIRS}
}
