use crate::llm::InferenceClient;

pub struct AppState {
    pub client: InferenceClient,
}
