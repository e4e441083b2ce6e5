use crate::ports::{LoanLedger, RecordStore};
use std::sync::Arc;

/// サービスの依存関係
///
/// データ構造として定義し、振る舞いは持たない。
/// 各サービス関数に明示的に渡される（グローバル状態は使わない）。
#[derive(Clone)]
pub struct ServiceDependencies {
    pub record_store: Arc<dyn RecordStore>,
    pub loan_ledger: Arc<dyn LoanLedger>,
}

impl ServiceDependencies {
    /// 両方のポートを実装する1つのストアから依存関係を作る
    pub fn from_store<S>(store: S) -> Self
    where
        S: RecordStore + LoanLedger + 'static,
    {
        let store = Arc::new(store);
        Self {
            record_store: store.clone(),
            loan_ledger: store,
        }
    }
}
