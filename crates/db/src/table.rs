use sea_query::Iden;

#[derive(Iden, Clone, Copy)]
pub enum User {
    Table,
    Id,
    Email,
    Username,
    FirstName,
    LastName,
    Password,
    Avatar,
    IsStaff,
    CreatedAt,
}

#[derive(Iden, Clone, Copy)]
pub enum Ingredient {
    Table,
    Id,
    Name,
    SearchName,
    MeasurementUnit,
}

#[derive(Iden, Clone, Copy)]
pub enum Recipe {
    Table,
    Id,
    AuthorId,
    Name,
    Text,
    CookingTime,
    Image,
    CreatedAt,
}

#[derive(Iden, Clone, Copy)]
pub enum RecipeIngredient {
    Table,
    RecipeId,
    IngredientId,
    Amount,
}

#[derive(Iden, Clone, Copy)]
pub enum FavoriteRecipe {
    Table,
    UserId,
    RecipeId,
    CreatedAt,
}

#[derive(Iden, Clone, Copy)]
pub enum ShoppingCart {
    Table,
    UserId,
    RecipeId,
    CreatedAt,
}

#[derive(Iden, Clone, Copy)]
pub enum Subscription {
    Table,
    Id,
    UserId,
    SubscribeId,
    CreatedAt,
}
