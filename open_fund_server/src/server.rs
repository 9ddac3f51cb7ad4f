use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use open_fund_engine::{AllocationApi, FundableApi, SqliteDatabase};

use crate::{
    config::ServerConfig,
    errors::ServerError,
    routes::{
        health,
        ContributionsListRoute,
        DeleteTargetRoute,
        MyContributionsRoute,
        NewContributionRoute,
        NewTargetRoute,
        TargetsListRoute,
        UpdateTargetRoute,
    },
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let db = SqliteDatabase::new_with_url(&config.database_url, 25)
        .await
        .map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let srv = create_server_instance(config, db)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig, db: SqliteDatabase) -> Result<Server, ServerError> {
    let host = config.host.clone();
    let port = config.port;
    let srv = HttpServer::new(move || {
        let allocations_api = AllocationApi::new(db.clone());
        let fundables_api = FundableApi::new(db.clone());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("ofg::access_log"))
            .app_data(web::Data::new(allocations_api))
            .app_data(web::Data::new(fundables_api))
            .app_data(web::Data::new(config.clone()))
            .service(health)
            .service(NewTargetRoute::<SqliteDatabase>::new())
            .service(TargetsListRoute::<SqliteDatabase>::new())
            .service(UpdateTargetRoute::<SqliteDatabase>::new())
            .service(DeleteTargetRoute::<SqliteDatabase>::new())
            .service(NewContributionRoute::<SqliteDatabase>::new())
            .service(ContributionsListRoute::<SqliteDatabase>::new())
            .service(MyContributionsRoute::<SqliteDatabase>::new())
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}
