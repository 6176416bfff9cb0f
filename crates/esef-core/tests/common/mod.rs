pub mod filing_server;
