mod generate;
mod profile;
mod select;
