/*
 * Responsibility
 * - middleware public interface
 * - access: per-route rule guards; http: request id / trace / limits
 */
pub mod access;
pub mod http;
