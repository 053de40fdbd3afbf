//! Domain models.

pub mod drink;

pub use drink::{
    default_menu, Drink, DrinkChanges, DrinkLong, DrinkShort, Ingredient, NewDrink, RecipeInput,
    ShortIngredient,
};
