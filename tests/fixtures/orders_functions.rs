// Test fixture: order functions of a small shop project

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct Order {
    pub id: u32,
    #[serde(rename = "customerName")]
    pub customer_name: String,
    pub note: Option<String>,
    pub status: OrderStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub enum OrderStatus {
    Open,
    Shipped,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrder {
    pub customer_name: String,
}

pub struct OrderFunctions;

#[query_parameter("tenant", description = "Tenant identifier")]
impl OrderFunctions {
    #[function_name("GetOrder")]
    #[header_parameter("X-Correlation-Id", required = false)]
    pub async fn get_order(
        &self,
        #[http_trigger("get", route = "orders/{id:int}")] req: HttpRequest,
        id: u32,
    ) -> Result<Json<Order>, OrderError> {
        todo!()
    }

    #[function_name("SaveOrder")]
    #[produces_response_type(Order, 201)]
    #[ignore_query_parameter("tenant")]
    pub async fn save_order(
        &self,
        #[http_trigger(methods = ["post", "put"], route = "orders")]
        #[body_type(CreateOrder)]
        req: HttpRequest,
    ) -> HttpResponse {
        todo!()
    }

    #[function_name("ListOrders")]
    #[query_parameter("page", ty = i32, required = false)]
    #[api_explorer_settings(group_name = "v2")]
    pub fn list_orders(&self, #[http_trigger("get", route = "orders")] req: HttpRequest) -> Vec<Order> {
        Vec::new()
    }

    #[function_name("PurgeOrders")]
    #[openapi_ignore]
    pub fn purge_orders(&self, #[http_trigger("delete", route = "orders")] req: HttpRequest) {}

    fn total(&self) -> u32 {
        0
    }
}

#[function_name("OrderQueueWorker")]
pub fn order_queue_worker(#[queue_trigger("orders")] message: String) {}
