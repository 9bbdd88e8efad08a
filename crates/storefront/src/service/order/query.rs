use crate::{
    abstract_trait::{
        order::{repository::DynOrderQueryRepository, service::OrderQueryServiceTrait},
        order_item::repository::DynOrderItemQueryRepository,
    },
    domain::{
        requests::order::FindAllOrders,
        response::{
            api::{ApiResponse, ApiResponsePagination},
            order::{OrderItemResponse, OrderResponse, OrderWithItemsResponse},
            pagination::Pagination,
        },
    },
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use shared::{
    errors::{RepositoryError, ServiceError},
    utils::{Method, ServiceTracer},
};
use tracing::{error, info};

#[derive(Clone)]
pub struct OrderQueryService {
    query: DynOrderQueryRepository,
    item_query: DynOrderItemQueryRepository,
    tracer: ServiceTracer,
}

impl OrderQueryService {
    pub fn new(
        query: DynOrderQueryRepository,
        item_query: DynOrderItemQueryRepository,
        registry: &mut Registry,
    ) -> Self {
        Self {
            query,
            item_query,
            tracer: ServiceTracer::new("order-query-service", registry),
        }
    }
}

#[async_trait]
impl OrderQueryServiceTrait for OrderQueryService {
    async fn find_all(
        &self,
        req: &FindAllOrders,
    ) -> Result<ApiResponsePagination<Vec<OrderResponse>>, ServiceError> {
        info!(
            "📦 Finding all orders | Page: {}, Size: {}, Search: '{}'",
            req.page, req.page_size, req.search
        );

        let method = Method::Get;
        let tracing_ctx = self.tracer.start_tracing(
            "FindAllOrders",
            vec![
                KeyValue::new("page", req.page.to_string()),
                KeyValue::new("page_size", req.page_size.to_string()),
                KeyValue::new("search", req.search.clone()),
            ],
        );

        let (orders, total) = match self.query.find_all(req).await {
            Ok(res) => res,
            Err(e) => {
                let log_message = format!("Failed to find orders: {e:?}");
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, &log_message);
                return Err(ServiceError::Repo(e));
            }
        };

        let data: Vec<OrderResponse> = orders.into_iter().map(OrderResponse::from).collect();

        self.tracer.complete_tracing_success(
            &tracing_ctx,
            method,
            &format!("Found {} orders (total: {total})", data.len()),
        );

        Ok(ApiResponsePagination {
            status: "success".to_string(),
            message: "Orders retrieved successfully".to_string(),
            data,
            pagination: Pagination::new(req.page, req.page_size, total),
        })
    }

    async fn find_by_id(
        &self,
        order_id: &str,
    ) -> Result<ApiResponse<OrderWithItemsResponse>, ServiceError> {
        let method = Method::Get;
        let tracing_ctx = self.tracer.start_tracing(
            "FindOrderById",
            vec![KeyValue::new("order.id", order_id.to_string())],
        );

        let order = match self.query.find_by_id(order_id).await {
            Ok(Some(order)) => order,
            Ok(None) => {
                self.tracer.complete_tracing_error(
                    &tracing_ctx,
                    method,
                    &format!("Order {order_id} not found"),
                );
                return Err(ServiceError::Repo(RepositoryError::NotFound));
            }
            Err(e) => {
                error!("❌ Failed to fetch order {order_id}: {e}");
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, &e.to_string());
                return Err(ServiceError::Repo(e));
            }
        };

        let items = match self.item_query.find_by_order(order_id).await {
            Ok(items) => items,
            Err(e) => {
                self.tracer
                    .complete_tracing_error(&tracing_ctx, method, &e.to_string());
                return Err(ServiceError::Repo(e));
            }
        };

        self.tracer.complete_tracing_success(
            &tracing_ctx,
            method,
            &format!("Order {order_id} found with {} items", items.len()),
        );

        Ok(ApiResponse::success(
            "Order retrieved successfully",
            OrderWithItemsResponse {
                order: OrderResponse::from(order),
                items: items.into_iter().map(OrderItemResponse::from).collect(),
            },
        ))
    }
}
