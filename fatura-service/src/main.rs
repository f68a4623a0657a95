use fatura_core::application::GatewayContext;
use fatura_core::foundation::{GatewayError, Result, TaxId};
use fatura_core::infrastructure::authority::{
    AuthorityBackend, ClientIdentity, HttpAuthorityClient, HttpTransport, MockAuthority, SoftwareInfo,
};
use fatura_core::infrastructure::config::{load_gateway_config, resolve_config_path, resolve_data_dir, BackendMode, GatewayConfig};
use fatura_core::infrastructure::logging::init_logger;
use fatura_core::infrastructure::signing::RequestSigner;
use fatura_core::infrastructure::storage::{JsonFileStore, RecordStore};
use fatura_service::api::{run_server, ApiState};
use log::{info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

fn load_config() -> Result<Arc<GatewayConfig>> {
    let data_dir = resolve_data_dir()?;
    let config_path = resolve_config_path(&data_dir);
    let config = Arc::new(load_gateway_config(&config_path)?);
    if let Err(errors) = config.validate() {
        for err in &errors {
            warn!("config validation error: {}", err);
        }
        return Err(GatewayError::ConfigError(format!("invalid configuration ({} errors)", errors.len())));
    }
    Ok(config)
}

fn build_backend(config: &GatewayConfig) -> Result<Arc<dyn AuthorityBackend>> {
    let tax_id = TaxId::from(config.tax_id.clone());
    match config.mode {
        BackendMode::Simulated => {
            info!("authority backend: simulated tax_id={}", tax_id);
            Ok(Arc::new(MockAuthority::new(tax_id)))
        }
        BackendMode::Live => {
            let key_path = config
                .signing_key_path
                .as_deref()
                .ok_or_else(|| GatewayError::ConfigError("live mode requires signing_key_path".to_string()))?;
            let pem = std::fs::read(key_path)?;
            let signer = RequestSigner::from_rsa_pem(&pem)?;
            let base_timeout = Duration::from_millis(config.base_timeout_ms);
            let transport = HttpTransport::new(config.authority_url.clone(), base_timeout)?;
            let identity = ClientIdentity {
                tax_id: tax_id.clone(),
                software: SoftwareInfo {
                    descriptor: config.software.descriptor.clone(),
                    signature: config.software.signature.clone(),
                },
            };
            info!("authority backend: live url={} tax_id={}", config.authority_url, tax_id);
            Ok(Arc::new(HttpAuthorityClient::new(transport, signer, identity, base_timeout)))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = load_config()?;
    init_logger(config.log.dir.as_deref(), &config.log.filters);
    info!("starting fatura gateway mode={} data_dir={}", config.mode, config.data_dir);

    let store_path = config.store_path();
    let store: Arc<dyn RecordStore> = Arc::new(JsonFileStore::open(&store_path)?);
    info!("record store ready path={}", store_path.display());

    let backend = build_backend(&config)?;
    let ctx = GatewayContext::new(config.clone(), store, backend);
    let state = Arc::new(ApiState::new(ctx));

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .map_err(|err| GatewayError::ConfigError(format!("invalid listen_addr {}: {}", config.listen_addr, err)))?;
    run_server(addr, state).await
}
