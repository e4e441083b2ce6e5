pub mod auth;
pub mod books;
pub mod loans;
pub mod members;
pub mod stats;
pub mod users;

use crate::application::ServiceDependencies;

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}
