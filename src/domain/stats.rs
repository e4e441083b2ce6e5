use serde::Serialize;

/// 蔵書・会員・貸出の集計（ダッシュボード用）
///
/// 不変条件：`available_books + active_loans == total_books`
/// （貸出中の貸出は書籍1冊につき最大1件で、その書籍だけが貸出不可になるため）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LibraryStats {
    pub total_books: i64,
    pub available_books: i64,
    pub total_members: i64,
    pub active_loans: i64,
}
