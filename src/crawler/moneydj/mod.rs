/// MoneyDJ 產業/概念股分類
pub mod category;
