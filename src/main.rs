use std::env;

use mensa_catalog::MensaClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if env::var(pretty_env_logger::env_logger::DEFAULT_FILTER_ENV).is_err() {
        env::set_var("RUST_LOG", "info");
    }
    pretty_env_logger::init_timed();
    log::info!("Starting Mensa catalog refresh...");

    let client = MensaClient::new();
    client.refresh_catalog().await?;

    for canteen in client.list_canteens()? {
        let meals = client.list_meals(&canteen.name)?;
        log::info!("{}: {} meals", canteen.name, meals.len());

        let enriched = client.fetch_meal_details(meals).await;
        for meal in enriched {
            log::info!(
                "  [{}] {} ({} ingredients, {} allergens)",
                meal.id,
                meal.name,
                meal.ingredients.len(),
                meal.allergens.len()
            );
        }
    }

    Ok(())
}
