use crate::{
    abstract_trait::order::{
        repository::DynOrderCommandRepository, service::OrderCommandServiceTrait,
    },
    domain::{
        line_item::{LineItemSnapshot, ParsedLineItems},
        requests::order::{CreateOrderRequest, CreatePendingOrderRecord},
        response::{api::ApiResponse, order::OrderResponse},
    },
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use rust_decimal::Decimal;
use shared::{
    errors::ServiceError,
    utils::{Method, ServiceTracer},
};
use tracing::{error, info};

#[derive(Clone)]
pub struct OrderCommandService {
    command: DynOrderCommandRepository,
    default_currency: String,
    tracer: ServiceTracer,
}

impl OrderCommandService {
    pub fn new(
        command: DynOrderCommandRepository,
        default_currency: &str,
        registry: &mut Registry,
    ) -> Self {
        Self {
            command,
            default_currency: default_currency.to_lowercase(),
            tracer: ServiceTracer::new("order-command-service", registry),
        }
    }
}

#[async_trait]
impl OrderCommandServiceTrait for OrderCommandService {
    async fn create_order(
        &self,
        req: &CreateOrderRequest,
    ) -> Result<ApiResponse<OrderResponse>, ServiceError> {
        info!(
            "🛒 Creating pending order {} | Total: {}",
            req.order_id, req.total_amount
        );

        let method = Method::Post;
        let tracing_ctx = self.tracer.start_tracing(
            "CreateOrder",
            vec![
                KeyValue::new("component", "order"),
                KeyValue::new("order.id", req.order_id.clone()),
            ],
        );

        if req.total_amount <= Decimal::ZERO {
            let msg = format!(
                "Order total must be greater than zero, got {}",
                req.total_amount
            );
            self.tracer
                .complete_tracing_error(&tracing_ctx, method, &msg);
            return Err(ServiceError::InvalidAmount(msg));
        }

        let snapshot = LineItemSnapshot {
            applications: ParsedLineItems::Parsed {
                items: req.applications.clone(),
            },
            standalone_services: ParsedLineItems::Parsed {
                items: req.standalone_services.clone(),
            },
        };

        let record = CreatePendingOrderRecord {
            order_id: req.order_id.trim().to_string(),
            total_amount: req.total_amount,
            currency: req
                .currency
                .as_deref()
                .map(str::to_lowercase)
                .unwrap_or_else(|| self.default_currency.clone()),
            customer_name: req.customer_name.clone(),
            customer_email: req.customer_email.clone(),
            customer_phone: req.customer_phone.clone(),
            applications_count: snapshot.applications_count(),
            services_count: snapshot.services_count(),
            line_items: snapshot.to_json(),
        };

        let order = match self.command.create_pending(&record).await {
            Ok(order) => order,
            Err(e) => {
                error!("❌ Failed to create order {}: {e}", record.order_id);
                self.tracer.complete_tracing_error(
                    &tracing_ctx,
                    method,
                    &format!("Failed to create order: {e}"),
                );
                return Err(ServiceError::Repo(e));
            }
        };

        self.tracer.complete_tracing_success(
            &tracing_ctx,
            method,
            &format!("Order {} created", order.order_id),
        );

        Ok(ApiResponse::success(
            "Order created successfully",
            OrderResponse::from(order),
        ))
    }
}
