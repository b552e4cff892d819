pub mod time_parser;
