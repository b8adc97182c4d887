#[actix_web::main]
async fn main() -> std::io::Result<()> {
    insightdesk_lib::run().await
}
