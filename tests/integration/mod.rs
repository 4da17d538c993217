mod ingestion_flow;
mod protocol_flow;
