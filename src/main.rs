#![forbid(unsafe_code)]

use lazy_static::lazy_static;
use log::info;
use poem::listener::TcpListener;

// Greeting Utilities
use crate::utils::config::{init_log, init_runtime_context, RuntimeCtx};
use crate::utils::errors::Errors;

// Modules
mod api;
mod engine;
mod utils;

// ***************************************************************************
//                                Constants
// ***************************************************************************
const SERVER_NAME : &str = "GreetingServer"; // for poem logging

// ***************************************************************************
//                             Static Variables
// ***************************************************************************
// Lazily initialize the parameters variable so that is has a 'static lifetime.
// We exit if we can't read our parameters.
lazy_static! {
    static ref RUNTIME_CTX: RuntimeCtx = init_runtime_context();
}

// ---------------------------------------------------------------------------
// main:
// ---------------------------------------------------------------------------
#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // --------------- Initialize Server --------------
    // Announce ourselves.
    println!("Starting greeting_server!");

    // Initialize the server.
    greeting_init();

    // --------------- Main Loop Set Up ---------------
    // The advertised URL appears in the generated openapi spec.
    let config = &RUNTIME_CTX.parms.config;
    let server_url = format!("http://{}:{}", config.http_addr, config.http_port);
    let app = api::build_app(&config.title, &server_url);

    // ------------------ Main Loop -------------------
    let addr = format!("{}:{}", config.http_addr, config.http_port);
    info!("Listening on {}", addr);
    poem::Server::new(TcpListener::bind(addr))
        .name(SERVER_NAME)
        .run(app)
        .await
}

// ***************************************************************************
//                             Private Functions
// ***************************************************************************
// ---------------------------------------------------------------------------
// greeting_init:
// ---------------------------------------------------------------------------
/** Initialize all subsystems and data structures other than those needed
 * to configure the main loop processor.
 */
fn greeting_init() {
    // Configure our log.
    init_log();

    // Force the reading of input parameters and initialization of runtime context.
    info!("{}", Errors::InputParms(format!("{:#?}", *RUNTIME_CTX)));

    // Log build info.
    print_version_info();
}

// ---------------------------------------------------------------------------
// print_version_info:
// ---------------------------------------------------------------------------
fn print_version_info() {
    info!("\n*** Running {}={}, SERVICE={}",
          env!("CARGO_PKG_NAME"),
          api::SERVER_VERSION,
          api::SERVICE_NAME);
}
