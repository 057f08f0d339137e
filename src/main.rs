use std::{io, sync::Arc};

use actix_cors::Cors;
use actix_web::{
    middleware::{self, Condition},
    web::Data,
    App, HttpServer,
};
use clap::Parser;
use person_gateway::{
    gateway::{directory::FixedPersonDirectory, gateway::ValidationGateway},
    server::routes,
};

/// Person Validation Gateway, an HTTP API that validates person records and
/// echoes them back to the caller
#[derive(Parser, Debug)]
struct Cli {
    /// Port the gateway will run on
    #[clap(short, long, default_value = "9000")]
    port: u16,

    /// Address the gateway will run on
    #[clap(short, long, default_value = "0.0.0.0")]
    address: String,

    /// Log every HTTP request
    #[clap(long)]
    log_http: bool,

    #[clap(long, default_value_t = 2)]
    http_workers: usize,
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Cli::parse();

    let gateway = ValidationGateway::new(Arc::new(FixedPersonDirectory::with_known_ids()));

    log::info!(
        "starting validation gateway on http://{}:{}",
        args.address,
        args.port
    );

    HttpServer::new(move || {
        App::new()
            .app_data(Data::new(gateway.clone()))
            .configure(routes::configure)
            .wrap(Cors::permissive())
            .wrap(Condition::new(args.log_http, middleware::Logger::default()))
    })
    .workers(args.http_workers)
    .bind((args.address, args.port))?
    .run()
    .await
}
