//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause
//! the current worker to stop processing new requests. Any long, non-cpu-bound operation (e.g. I/O, database
//! operations, etc.) should be expressed as futures or asynchronous functions, which get executed concurrently by
//! worker threads and thus don't block execution.
use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use log::*;
use open_fund_engine::{
    fundable_objects::TargetUpdate,
    traits::{FundGatewayDatabase, FundableManagement},
    AllocationApi,
    FundableApi,
};

use crate::{
    config::ServerConfig,
    data_objects::{ContributionView, JsonResponse, NewContributionRequest, NewTargetRequest},
    errors::ServerError,
    helpers::{require_admin, require_contributor, validate_amount, validate_new_target, validate_target_update},
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//--------------------------------------------   Targets  ------------------------------------------------------

route!(new_target => Post "/targets" impl FundGatewayDatabase);
/// Route handler for creating a funding target. Admin only.
///
/// The request is validated (name present and at most 100 characters, description present,
/// positive amount; the unique-name rule is enforced inside the storage transaction), then handed
/// to the allocation engine. The returned record reflects the settlement pass against the open
/// contribution pool, so it may come back partially or even fully invested.
pub async fn new_target<B: FundGatewayDatabase>(
    req: HttpRequest,
    body: web::Json<NewTargetRequest>,
    api: web::Data<AllocationApi<B>>,
    config: web::Data<ServerConfig>,
) -> Result<HttpResponse, ServerError> {
    require_admin(&req, &config)?;
    let request = body.into_inner();
    debug!("💻️ POST new funding target '{}' for {}", request.name, request.full_amount);
    validate_new_target(&request)?;
    let target = api.process_new_target(request.into()).await?;
    Ok(HttpResponse::Ok().json(target))
}

route!(targets_list => Get "/targets" impl FundableManagement);
/// Route handler for the public funding-target listing, in creation order.
pub async fn targets_list<B: FundableManagement>(
    api: web::Data<FundableApi<B>>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET targets");
    let targets = api.targets().await?;
    Ok(HttpResponse::Ok().json(targets))
}

route!(update_target => Patch "/targets/{id}" impl FundGatewayDatabase);
/// Route handler for editing a funding target. Admin only.
///
/// Only open targets can be edited. Lowering the full amount below what has already been invested
/// is refused; lowering it to exactly the invested amount closes the target.
pub async fn update_target<B: FundGatewayDatabase>(
    req: HttpRequest,
    path: web::Path<i64>,
    body: web::Json<TargetUpdate>,
    api: web::Data<AllocationApi<B>>,
    config: web::Data<ServerConfig>,
) -> Result<HttpResponse, ServerError> {
    require_admin(&req, &config)?;
    let id = path.into_inner();
    let update = body.into_inner();
    debug!("💻️ PATCH target {id}");
    validate_target_update(&update)?;
    let target = api.update_target(id, update).await?;
    Ok(HttpResponse::Ok().json(target))
}

route!(delete_target => Delete "/targets/{id}" impl FundGatewayDatabase);
/// Route handler for deleting a funding target. Admin only.
///
/// Only an open target with nothing invested in it can be deleted.
pub async fn delete_target<B: FundGatewayDatabase>(
    req: HttpRequest,
    path: web::Path<i64>,
    api: web::Data<AllocationApi<B>>,
    config: web::Data<ServerConfig>,
) -> Result<HttpResponse, ServerError> {
    require_admin(&req, &config)?;
    let id = path.into_inner();
    debug!("💻️ DELETE target {id}");
    let target = api.delete_target(id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Funding target '{}' has been deleted", target.name))))
}

//------------------------------------------   Contributions  --------------------------------------------------

route!(new_contribution => Post "/contributions" impl FundGatewayDatabase);
/// Route handler for making a contribution.
///
/// The contributor's identity is taken from the `ofg-user-id` header. The contribution is stored
/// and settled against the open funding targets, oldest first, in one atomic pass; the full
/// record, including its allocation state, is returned.
pub async fn new_contribution<B: FundGatewayDatabase>(
    req: HttpRequest,
    body: web::Json<NewContributionRequest>,
    api: web::Data<AllocationApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let contributor_id = require_contributor(&req)?;
    let request = body.into_inner();
    debug!("💻️ POST new contribution of {} from [{contributor_id}]", request.full_amount);
    validate_amount(request.full_amount)?;
    let contribution = api.process_new_contribution(request.into_new_contribution(contributor_id)).await?;
    Ok(HttpResponse::Ok().json(contribution))
}

route!(contributions_list => Get "/contributions" impl FundableManagement);
/// Route handler for the full contribution listing, allocation bookkeeping included. Admin only.
pub async fn contributions_list<B: FundableManagement>(
    req: HttpRequest,
    api: web::Data<FundableApi<B>>,
    config: web::Data<ServerConfig>,
) -> Result<HttpResponse, ServerError> {
    require_admin(&req, &config)?;
    trace!("💻️ GET contributions");
    let contributions = api.contributions().await?;
    Ok(HttpResponse::Ok().json(contributions))
}

route!(my_contributions => Get "/contributions/my" impl FundableManagement);
/// Route handler for the calling contributor's own contributions.
///
/// Returns the trimmed [`ContributionView`]: contributors see what they gave and when, not how
/// the gateway allocated it.
pub async fn my_contributions<B: FundableManagement>(
    req: HttpRequest,
    api: web::Data<FundableApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let contributor_id = require_contributor(&req)?;
    debug!("💻️ GET contributions for [{contributor_id}]");
    let contributions = api.contributions_for_user(&contributor_id).await?;
    let views = contributions.into_iter().map(ContributionView::from).collect::<Vec<_>>();
    Ok(HttpResponse::Ok().json(views))
}
