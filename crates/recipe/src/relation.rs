use foodgram_db::table::{FavoriteRecipe, ShoppingCart};
use foodgram_shared::relation::Relation;

// Actor is a user id and target a recipe id, so equal values are unrelated.
pub const FAVORITE: Relation<FavoriteRecipe> = Relation {
    label: "favorite",
    table: FavoriteRecipe::Table,
    actor: FavoriteRecipe::UserId,
    target: FavoriteRecipe::RecipeId,
    created_at: FavoriteRecipe::CreatedAt,
    allow_self: true,
};

pub const SHOPPING_CART: Relation<ShoppingCart> = Relation {
    label: "shopping cart entry",
    table: ShoppingCart::Table,
    actor: ShoppingCart::UserId,
    target: ShoppingCart::RecipeId,
    created_at: ShoppingCart::CreatedAt,
    allow_self: true,
};
