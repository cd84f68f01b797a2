use std::sync::Arc;

use anyhow::Result;
use deskbot_application::KnowledgeInjection;
use deskbot_core::api::HelpdeskApi;

use super::report;

pub async fn run(api: Arc<dyn HelpdeskApi>, text: String) -> Result<()> {
    let form = KnowledgeInjection::new(api);
    form.open().await;
    form.set_text(text).await;
    match form.submit().await {
        Some(notice) => report(notice),
        None => Ok(()),
    }
}
