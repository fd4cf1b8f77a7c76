use foodgram_db::table::Subscription;
use foodgram_shared::relation::Relation;

use crate::repository;

pub const SUBSCRIPTION: Relation<Subscription> = Relation {
    label: "subscription",
    table: Subscription::Table,
    actor: Subscription::UserId,
    target: Subscription::SubscribeId,
    created_at: Subscription::CreatedAt,
    allow_self: false,
};

impl crate::Command {
    pub async fn subscribe(&self, id: i64, author_id: i64) -> foodgram_shared::Result<()> {
        if id != author_id && !repository::exists(&self.read_db, author_id).await? {
            foodgram_shared::not_found!("user");
        }

        SUBSCRIPTION.add(&self.write_db, id, author_id).await
    }

    pub async fn unsubscribe(&self, id: i64, author_id: i64) -> foodgram_shared::Result<()> {
        if !repository::exists(&self.read_db, author_id).await? {
            foodgram_shared::not_found!("user");
        }

        SUBSCRIPTION.remove(&self.write_db, id, author_id).await
    }
}
