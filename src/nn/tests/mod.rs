mod activation;
mod network_forward;
mod save_load;
