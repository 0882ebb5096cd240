pub mod font_info;
pub mod head;
pub mod sfnt;
pub mod subsetter;
