mod behavioral;
mod common;
