use mcp_tool_server::config::ServerConfig;
use mcp_tool_server::logging;
use mcp_tool_server::server::McpServer;
use mcp_tool_server::tools::random_number;
use mcp_tool_server::transport::StdioTransport;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = match ServerConfig::new("random-number-server", "1.0.0").with_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("mcp-tool-server: configuration error: {e}");
            std::process::exit(1);
        }
    };
    logging::init_logging(&config.log);

    let mut server = McpServer::new(config);
    server.register_tool(random_number::tool());

    let mut transport = StdioTransport::new();
    if let Err(e) = server.run(&mut transport).await {
        eprintln!("mcp-tool-server: fatal error: {e}");
        std::process::exit(1);
    }
}
