use fatura_core::application::{GatewayContext, SyncCoordinator};
use std::sync::Arc;

#[derive(Clone)]
pub struct ApiState {
    pub ctx: GatewayContext,
    pub coordinator: Arc<SyncCoordinator>,
}

impl ApiState {
    pub fn new(ctx: GatewayContext) -> Self {
        let coordinator = Arc::new(SyncCoordinator::new(ctx.clone()));
        ApiState { ctx, coordinator }
    }
}
