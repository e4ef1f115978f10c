mod test_health_endpoint;
mod test_websocket_relay_end_to_end;
