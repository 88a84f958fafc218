pub mod block_diagram;
