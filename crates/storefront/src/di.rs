use crate::{
    abstract_trait::{
        admin::{DynAdminAuthService, DynAdminRepository, DynAdminService},
        gateway::DynPaymentGateway,
        order::{
            repository::{DynOrderCommandRepository, DynOrderQueryRepository},
            service::{DynOrderCommandService, DynOrderQueryService},
        },
        order_item::repository::{DynOrderItemCommandRepository, DynOrderItemQueryRepository},
        payment::DynPaymentIntentService,
        webhook::{DynOrderReconciler, DynWebhookService},
    },
    config::{AdminConfig, Config},
    gateway::{StripeGateway, StripeSignatureVerifier},
    repository::{
        admin::AdminRepository,
        order::{OrderCommandRepository, OrderQueryRepository},
        order_item::{OrderItemCommandRepository, OrderItemQueryRepository},
    },
    service::{
        admin::{AdminAuthService, AdminService},
        order::{OrderCommandService, OrderQueryService},
        payment_intent::PaymentIntentService,
        reconciler::OrderReconciler,
        webhook::WebhookService,
    },
};
use anyhow::Result;
use prometheus_client::registry::Registry;
use shared::{
    abstract_trait::{DynHashing, DynJwtService},
    config::{ConnectionPool, Hashing},
};
use std::sync::Arc;

#[derive(Clone)]
pub struct DependenciesInject {
    pub payment_intent_service: DynPaymentIntentService,
    pub webhook_service: DynWebhookService,
    pub order_command_service: DynOrderCommandService,
    pub order_query_service: DynOrderQueryService,
    pub admin_service: DynAdminService,
    pub admin_auth_service: DynAdminAuthService,
}

impl std::fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("payment_intent_service", &"DynPaymentIntentService")
            .field("webhook_service", &"DynWebhookService")
            .field("order_command_service", &"DynOrderCommandService")
            .field("order_query_service", &"DynOrderQueryService")
            .field("admin_service", &"DynAdminService")
            .field("admin_auth_service", &"DynAdminAuthService")
            .finish()
    }
}

/// Everything the services need from the outside world. Tests build this
/// with in-memory fakes; the server builds it from a Postgres pool.
#[derive(Clone)]
pub struct DependenciesInjectDeps {
    pub order_command: DynOrderCommandRepository,
    pub order_query: DynOrderQueryRepository,
    pub order_item_command: DynOrderItemCommandRepository,
    pub order_item_query: DynOrderItemQueryRepository,
    pub admin_repository: DynAdminRepository,
    pub gateway: DynPaymentGateway,
    pub hashing: DynHashing,
    pub jwt: DynJwtService,
    pub webhook_secret: String,
    pub default_currency: String,
    pub admin: AdminConfig,
}

impl DependenciesInjectDeps {
    pub fn postgres(pool: ConnectionPool, config: &Config, jwt: DynJwtService) -> Result<Self> {
        let gateway = StripeGateway::new(&config.stripe)?;

        Ok(Self {
            order_command: Arc::new(OrderCommandRepository::new(pool.clone())),
            order_query: Arc::new(OrderQueryRepository::new(pool.clone())),
            order_item_command: Arc::new(OrderItemCommandRepository::new(pool.clone())),
            order_item_query: Arc::new(OrderItemQueryRepository::new(pool.clone())),
            admin_repository: Arc::new(AdminRepository::new(pool)),
            gateway: Arc::new(gateway),
            hashing: Arc::new(Hashing::new()),
            jwt,
            webhook_secret: config.stripe.webhook_secret.clone(),
            default_currency: config.default_currency.clone(),
            admin: config.admin.clone(),
        })
    }
}

impl DependenciesInject {
    pub fn new(deps: DependenciesInjectDeps, registry: &mut Registry) -> Self {
        let DependenciesInjectDeps {
            order_command,
            order_query,
            order_item_command,
            order_item_query,
            admin_repository,
            gateway,
            hashing,
            jwt,
            webhook_secret,
            default_currency,
            admin,
        } = deps;

        let payment_intent_service: DynPaymentIntentService = Arc::new(
            PaymentIntentService::new(gateway, &default_currency, registry),
        );

        let reconciler: DynOrderReconciler = Arc::new(OrderReconciler::new(
            order_command.clone(),
            order_item_command,
            registry,
        ));

        let webhook_service: DynWebhookService = Arc::new(WebhookService::new(
            StripeSignatureVerifier::new(&webhook_secret),
            reconciler,
            registry,
        ));

        let order_command_service: DynOrderCommandService = Arc::new(OrderCommandService::new(
            order_command,
            &default_currency,
            registry,
        ));

        let order_query_service: DynOrderQueryService = Arc::new(OrderQueryService::new(
            order_query,
            order_item_query,
            registry,
        ));

        let admin_service: DynAdminService =
            Arc::new(AdminService::new(admin_repository, registry));

        let admin_auth_service: DynAdminAuthService = Arc::new(AdminAuthService::new(
            &admin.username,
            &admin.password_hash,
            hashing,
            jwt,
        ));

        Self {
            payment_intent_service,
            webhook_service,
            order_command_service,
            order_query_service,
            admin_service,
            admin_auth_service,
        }
    }
}
