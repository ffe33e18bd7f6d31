mod config;
mod injector;
