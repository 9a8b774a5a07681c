//! Categories and products.

pub mod category;
pub mod product;

pub use category::{
    add_category, delete_category, edit_category, get_category, list_categories,
    list_child_categories, list_products_in_category, CategoryPatch, NewCategory,
};
pub use product::{
    add_product, delete_product, edit_product, get_product, list_products, NewProduct,
    ProductPatch,
};
