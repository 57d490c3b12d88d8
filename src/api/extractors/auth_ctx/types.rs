/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - middleware が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - JWT の検証ロジックは middleware/services 側の責務
 * - ここは「型（契約）」として固定化する
 */

/// 認証済みのリクエストに付与されるコンテキスト
///
/// - `user_id` / `username` は token の claims そのまま (store の再参照はしない)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub user_id: i64,
    pub username: String,
}

impl AuthCtx {
    pub fn new(user_id: i64, username: String) -> Self {
        Self { user_id, username }
    }
}
