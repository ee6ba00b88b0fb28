pub mod dot_product_i8;
pub mod score_batch_i8;
