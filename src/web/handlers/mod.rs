pub mod artists;
pub mod pages;
pub mod shows;
pub mod venues;
