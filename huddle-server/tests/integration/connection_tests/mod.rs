mod test_peer_disconnect_republishes;
mod test_websocket_session;
